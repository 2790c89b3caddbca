// src/environment/fallback.rs

//! Non-Windows backend.
//!
//! Linux exposes the tracer of a process in `/proc/self/status`; that stands
//! in for the in-process flag. There is no separate debug-port query and no
//! first-chance exception model, so those probes report `Unsupported` and
//! the prober treats them as not triggered.

use super::{ExceptionOutcome, HostEnvironment};
use crate::error::ProbeError;
use std::time::Instant;

/// `Instant` ticks are reported in nanoseconds.
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Live process state via procfs and the monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct NativeEnvironment {
    epoch: Instant,
}

impl NativeEnvironment {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for NativeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for NativeEnvironment {
    #[cfg(target_os = "linux")]
    fn debugger_flag(&self) -> Result<bool, ProbeError> {
        let status = std::fs::read_to_string("/proc/self/status")
            .map_err(|source| ProbeError::QueryFailed { probe: "debugger_flag", source })?;
        Ok(parse_tracer_pid(&status).is_some_and(|pid| pid > 0))
    }

    #[cfg(not(target_os = "linux"))]
    fn debugger_flag(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported { probe: "debugger_flag" })
    }

    fn remote_debugger(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported { probe: "remote_debugger" })
    }

    fn counter_frequency(&self) -> Option<u64> {
        Some(NANOS_PER_SEC)
    }

    fn read_counter(&self) -> Option<u64> {
        u64::try_from(self.epoch.elapsed().as_nanos()).ok()
    }

    fn raise_probe_exception(&self) -> Result<ExceptionOutcome, ProbeError> {
        Err(ProbeError::Unsupported { probe: "exception_interception" })
    }
}

/// Extract the `TracerPid:` value from a `/proc/<pid>/status` document.
pub fn parse_tracer_pid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|raw| raw.trim().parse::<u32>().ok())
}

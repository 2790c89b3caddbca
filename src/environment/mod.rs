// src/environment/mod.rs

//! # Host environment capabilities
//!
//! Every OS or CPU observation the detectors need goes through
//! [`HostEnvironment`]. The native implementation is selected per target;
//! tests substitute fakes that return controlled values and count calls.
//!
//! Key responsibilities:
//! - Read the in-process debugger flag.
//! - Ask the OS whether a debugger is attached.
//! - Expose a high-resolution counter and its frequency.
//! - Raise and locally capture a benign exception.

use crate::detectors::timing::busy_work;
use crate::error::ProbeError;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::NativeEnvironment;

#[cfg(not(windows))]
mod fallback;
#[cfg(not(windows))]
pub use self::fallback::{parse_tracer_pid, NativeEnvironment};

/// Result of raising the probe exception inside a scoped handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionOutcome {
    /// `true` when the local handler never observed the exception.
    pub intercepted_externally: bool,
}

impl ExceptionOutcome {
    pub const HANDLED_LOCALLY: Self = Self { intercepted_externally: false };
    pub const INTERCEPTED: Self = Self { intercepted_externally: true };
}

/// Read-only view of the calling process's runtime state.
pub trait HostEnvironment {
    /// OS-maintained "being debugged" flag of this process.
    fn debugger_flag(&self) -> Result<bool, ProbeError>;

    /// OS query for any attached debugger, including ones that cleared the flag.
    fn remote_debugger(&self) -> Result<bool, ProbeError>;

    /// Counter ticks per second, `None` when no high-resolution counter exists.
    fn counter_frequency(&self) -> Option<u64>;

    /// Current counter value in ticks.
    fn read_counter(&self) -> Option<u64>;

    /// Bracketed workload of the timing detector.
    fn run_workload(&self, iterations: u32) -> u64 {
        busy_work(iterations)
    }

    /// Raise a benign exception inside a scoped local handler.
    fn raise_probe_exception(&self) -> Result<ExceptionOutcome, ProbeError>;
}

impl<E: HostEnvironment + ?Sized> HostEnvironment for &E {
    fn debugger_flag(&self) -> Result<bool, ProbeError> {
        (**self).debugger_flag()
    }

    fn remote_debugger(&self) -> Result<bool, ProbeError> {
        (**self).remote_debugger()
    }

    fn counter_frequency(&self) -> Option<u64> {
        (**self).counter_frequency()
    }

    fn read_counter(&self) -> Option<u64> {
        (**self).read_counter()
    }

    fn run_workload(&self, iterations: u32) -> u64 {
        (**self).run_workload(iterations)
    }

    fn raise_probe_exception(&self) -> Result<ExceptionOutcome, ProbeError> {
        (**self).raise_probe_exception()
    }
}

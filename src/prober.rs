// src/prober.rs

//! # Environment Prober
//!
//! Runs the detectors in priority order and maps the first one that fires
//! to its verdict. Later detectors are never evaluated once one fires, so
//! exactly one verdict comes out of every call.
//!
//! Failure policy: a detector returning `Err` is inconclusive and counts as
//! "not triggered". The probe favours a missed detection over crashing or
//! falsely flagging the host.

use crate::config::ProbeConfig;
use crate::detectors::Detector;
use crate::environment::{HostEnvironment, NativeEnvironment};
use crate::verdict::Verdict;
use log::Level;

/// Stateless between calls; `check` may run any number of times.
#[derive(Debug, Clone)]
pub struct EnvironmentProber<E = NativeEnvironment> {
    env:    E,
    config: ProbeConfig,
}

impl EnvironmentProber<NativeEnvironment> {
    /// Live process state with build-time defaults.
    pub fn native() -> Self {
        Self::new(NativeEnvironment::new(), ProbeConfig::default())
    }
}

impl<E: HostEnvironment> EnvironmentProber<E> {
    pub fn new(env: E, config: ProbeConfig) -> Self {
        Self { env, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Evaluate the active detectors; first positive wins.
    pub fn check(&self) -> Verdict {
        Detector::sequence(&self.config)
            .find(|detector| self.evaluate(*detector))
            .map_or(Verdict::Clean, Detector::verdict)
    }

    fn evaluate(&self, detector: Detector) -> bool {
        match detector.run(&self.env, &self.config) {
            Ok(true) => {
                guard_log!(Level::Warn, "prober", "{} triggered → {}", detector, detector.verdict());
                true
            }
            Ok(false) => false,
            Err(err) => {
                guard_log!(Level::Debug, "prober", "{} inconclusive, treating as clean: {}", detector, err);
                false
            }
        }
    }
}

// src/integrity.rs

//! Host-side integrity assertion.
//!
//! Runs the probe once and turns a non-clean verdict into either an error
//! (`Block`) or a logged warning (`Audit`).

use crate::environment::HostEnvironment;
use crate::prober::EnvironmentProber;
use crate::verdict::Verdict;
use log::Level;
use thiserror::Error;

/// What to do when the probe reports a threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Fail with [`IntegrityViolation`].
    Block,
    /// Log only and carry on.
    Audit,
}

impl Enforcement {
    pub fn from_block_on_detection(block: bool) -> Self {
        if block { Enforcement::Block } else { Enforcement::Audit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("integrity violation: {verdict}")]
pub struct IntegrityViolation {
    pub verdict: Verdict,
}

/// Probe the process and enforce the result.
///
/// Returns the verdict when clean or when running in `Audit` mode.
pub fn assert_integrity<E: HostEnvironment>(
    prober: &EnvironmentProber<E>,
    enforcement: Enforcement,
) -> Result<Verdict, IntegrityViolation> {
    guard_log!(Level::Info, "integrity", "Checking process integrity...");

    let verdict = prober.check();
    if verdict.is_clean() {
        guard_log!(Level::Info, "integrity", "Environment clean. No debuggers detected.");
        return Ok(verdict);
    }

    guard_log!(
        Level::Error,
        "integrity",
        "Integrity violation! Threat: {} - {}",
        verdict.code(),
        verdict.threat()
    );
    match enforcement {
        Enforcement::Block => Err(IntegrityViolation { verdict }),
        Enforcement::Audit => {
            guard_log!(Level::Warn, "integrity", "Audit mode: continuing despite {}", verdict);
            Ok(verdict)
        }
    }
}

// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for `main.rs`, the C
// export in `ffi.rs`, and integration tests.

#[macro_use]
pub mod macros;

pub mod config;
pub mod detectors;
pub mod environment;
pub mod error;
pub mod ffi;
pub mod integrity;
pub mod prober;
pub mod verdict;

pub use config::{GuardConfig, ProbeConfig};
pub use detectors::Detector;
pub use environment::{ExceptionOutcome, HostEnvironment, NativeEnvironment};
pub use error::{ConfigError, ProbeError};
pub use ffi::check_environment;
pub use integrity::{assert_integrity, Enforcement, IntegrityViolation};
pub use prober::EnvironmentProber;
pub use verdict::Verdict;

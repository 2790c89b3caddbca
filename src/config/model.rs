// src/config/model.rs

//! Configuration structures.
//!
//! Raw TOML tables (`*Section`) are kept apart from the typed runtime
//! values (`ProbeConfig`, `GuardConfig`) that the prober and the host use.

use serde::Deserialize;
use std::time::Duration;

/// Default budget for the timing workload. Normal execution finishes in a
/// few microseconds; single-stepping overshoots by orders of magnitude.
pub const DEFAULT_TIMING_THRESHOLD: Duration = Duration::from_micros(500);
pub const DEFAULT_WORKLOAD_ITERATIONS: u32 = 1_000;
/// Upper bound on the busy loop. Stays well inside the default threshold
/// even in unoptimised builds; raise the threshold before the iterations.
pub const MAX_WORKLOAD_ITERATIONS: u32 = 10_000;

/// Compile-time threshold override for the exported symbol, in microseconds.
const COMPILETIME_THRESHOLD_US: Option<&str> = option_env!("NATIVE_GUARD_TIMING_THRESHOLD_US");

/// Settings consumed by one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Adds the exception-interception detector to the sequence.
    pub enable_exception_check: bool,
    /// Elapsed time strictly above this is a timing anomaly.
    pub timing_threshold: Duration,
    pub workload_iterations: u32,
}

impl Default for ProbeConfig {
    /// Build-time defaults only: the exported symbol must not read the
    /// process environment.
    fn default() -> Self {
        Self {
            enable_exception_check: cfg!(feature = "exception-check"),
            timing_threshold: compiletime_threshold().unwrap_or(DEFAULT_TIMING_THRESHOLD),
            workload_iterations: DEFAULT_WORKLOAD_ITERATIONS,
        }
    }
}

impl ProbeConfig {
    pub fn threshold_micros(&self) -> u128 {
        self.timing_threshold.as_micros()
    }
}

fn compiletime_threshold() -> Option<Duration> {
    COMPILETIME_THRESHOLD_US.and_then(threshold_from_micros)
}

/// Parse a whole-microsecond threshold. Zero would flag every run and is
/// ignored.
pub fn threshold_from_micros(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|us| *us > 0)
        .map(Duration::from_micros)
}

/// Host-side configuration: probe settings plus enforcement and logging.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub probe:              ProbeConfig,
    /// Block (fail) on detection instead of only logging it.
    pub block_on_detection: bool,
    pub logging:            LoggingConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            probe:              ProbeConfig::default(),
            block_on_detection: true,
            logging:            LoggingConfig::default(),
        }
    }
}

/// Top-level file as deserialized from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardFile {
    #[serde(default)] pub probe:   ProbeSection,
    #[serde(default)] pub logging: LoggingConfig,
}

/// Mirror of the `[probe]` table. Missing keys keep the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    pub enable_exception_check: Option<bool>,
    /// humantime string, e.g. `"500us"` or `"2ms"`
    pub timing_threshold:       Option<String>,
    pub workload_iterations:    Option<u32>,
    pub block_on_detection:     Option<bool>,
}

/// Mirror of the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]                   pub enable: bool,
    #[serde(default)]                   pub file:   Option<String>,
    #[serde(default = "default_level")] pub level:  String,
}

fn default_level() -> String { "INFO".into() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enable: false, file: None, level: default_level() }
    }
}

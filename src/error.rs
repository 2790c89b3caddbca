// src/error.rs

//! Error types shared by the detectors and the configuration layer.
//!
//! None of these ever cross the C boundary: the prober narrows every
//! `ProbeError` to "not triggered" and the exported symbol only returns a
//! verdict code.

use std::io;
use thiserror::Error;

/// Why a single detector could not reach a conclusion.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe '{probe}' is not supported on this platform")]
    Unsupported { probe: &'static str },

    #[error("probe '{probe}' query failed: {source}")]
    QueryFailed {
        probe: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("high-resolution counter unavailable")]
    TimerUnavailable,
}

impl ProbeError {
    /// Capture the calling thread's last OS error for `probe`.
    pub fn last_os_error(probe: &'static str) -> Self {
        ProbeError::QueryFailed { probe, source: io::Error::last_os_error() }
    }
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

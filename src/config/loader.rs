// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `default.toml`, deserializes into `GuardFile`, converts it into a
//! runtime `GuardConfig`, and layers `NATIVE_GUARD_*` overrides on top.
//!
//! Only hosts go through this module. `CheckEnvironment` uses
//! `ProbeConfig::default()` and never touches the environment.

use crate::config::model::{
    GuardConfig, GuardFile, ProbeSection, MAX_WORKLOAD_ITERATIONS,
};
use crate::error::ConfigError;
use log::Level;
use std::{fs, io, path::Path, time::Duration};

pub const ENV_ENABLE_EXCEPTION_CHECK: &str = "NATIVE_GUARD_ENABLE_EXCEPTION_CHECK";
pub const ENV_TIMING_THRESHOLD:       &str = "NATIVE_GUARD_TIMING_THRESHOLD";
pub const ENV_WORKLOAD_ITERATIONS:    &str = "NATIVE_GUARD_WORKLOAD_ITERATIONS";
pub const ENV_BLOCK_ON_DETECTION:     &str = "NATIVE_GUARD_BLOCK_ON_DETECTION";
pub const ENV_LOG_LEVEL:              &str = "NATIVE_GUARD_LOG_LEVEL";

/// Load and parse the configuration from `path`.
pub fn load(path: &Path) -> Result<GuardConfig, ConfigError> {
    guard_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg = parse(&txt)?;
    guard_log!(Level::Info, "config", "Loaded config from {:?}", path);
    Ok(cfg)
}

/// Like [`load`], but a missing file yields the built-in defaults.
pub fn load_or_default(path: &Path) -> Result<GuardConfig, ConfigError> {
    match load(path) {
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            guard_log!(Level::Info, "config", "No config at {:?}, using defaults", path);
            Ok(GuardConfig::default())
        }
        other => other,
    }
}

/// Parse TOML text into a runtime config.
pub fn parse(txt: &str) -> Result<GuardConfig, ConfigError> {
    let file: GuardFile = toml::from_str(txt)?;
    let mut cfg = GuardConfig { logging: file.logging, ..GuardConfig::default() };
    apply_section(&mut cfg, file.probe)?;
    Ok(cfg)
}

fn apply_section(cfg: &mut GuardConfig, section: ProbeSection) -> Result<(), ConfigError> {
    if let Some(enabled) = section.enable_exception_check {
        cfg.probe.enable_exception_check = enabled;
    }
    if let Some(raw) = section.timing_threshold {
        cfg.probe.timing_threshold = parse_threshold(&raw)?;
    }
    if let Some(iterations) = section.workload_iterations {
        cfg.probe.workload_iterations = check_iterations("probe.workload_iterations", iterations)?;
    }
    if let Some(block) = section.block_on_detection {
        cfg.block_on_detection = block;
    }
    Ok(())
}

/// Apply `NATIVE_GUARD_*` overrides, reading values through `lookup`
/// (normally `std::env::var`).
pub fn apply_overrides<F>(cfg: &mut GuardConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_ENABLE_EXCEPTION_CHECK) {
        cfg.probe.enable_exception_check = parse_bool(ENV_ENABLE_EXCEPTION_CHECK, &raw)?;
    }
    if let Some(raw) = lookup(ENV_TIMING_THRESHOLD) {
        cfg.probe.timing_threshold = parse_threshold(&raw)?;
    }
    if let Some(raw) = lookup(ENV_WORKLOAD_ITERATIONS) {
        let iterations = raw.trim().parse::<u32>().map_err(|_| invalid(ENV_WORKLOAD_ITERATIONS, &raw))?;
        cfg.probe.workload_iterations = check_iterations(ENV_WORKLOAD_ITERATIONS, iterations)?;
    }
    if let Some(raw) = lookup(ENV_BLOCK_ON_DETECTION) {
        cfg.block_on_detection = parse_bool(ENV_BLOCK_ON_DETECTION, &raw)?;
    }
    if let Some(raw) = lookup(ENV_LOG_LEVEL) {
        cfg.logging.level = raw.trim().to_string();
    }
    guard_log!(Level::Debug, "config", "Effective probe config: {:?}", cfg.probe);
    Ok(())
}

/// Convenience wrapper reading overrides from the process environment.
pub fn apply_env_overrides(cfg: &mut GuardConfig) -> Result<(), ConfigError> {
    apply_overrides(cfg, |key| std::env::var(key).ok())
}

/// Parse a humantime duration such as `"500us"`. The detector compares whole
/// microseconds, so anything below 1µs would flag every run and is rejected.
pub fn parse_threshold(raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();
    let threshold = humantime::parse_duration(trimmed)
        .map_err(|e| ConfigError::InvalidDuration(trimmed.to_string(), e))?;
    if threshold.as_micros() == 0 {
        return Err(invalid("timing_threshold", raw));
    }
    Ok(threshold)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "enabled" | "on" => Ok(true),
        "0" | "false" | "no" | "disabled" | "off" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}

fn check_iterations(key: &str, iterations: u32) -> Result<u32, ConfigError> {
    if iterations == 0 || iterations > MAX_WORKLOAD_ITERATIONS {
        return Err(invalid(key, &iterations.to_string()));
    }
    Ok(iterations)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() }
}

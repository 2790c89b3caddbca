// src/main.rs

//! `guard-probe`: console host for the environment probe.
//!
//! 1. Load `default.toml` next to the executable (defaults when absent)
//! 2. Apply `NATIVE_GUARD_*` overrides
//! 3. Set up structured logging
//! 4. Run the probe and enforce the verdict
//! 5. Exit with the verdict code when blocked, 0 otherwise

// ───── std / 3rd-party imports ──────────────────────────────────────────────
use anyhow::Context;
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process,
    thread,
};

// ───── local imports ────────────────────────────────────────────────────────
use native_guard::config::{self, GuardConfig};
use native_guard::{assert_integrity, Enforcement, EnvironmentProber, NativeEnvironment};

const CONFIG_FILE: &str = "default.toml";

// ───── helpers ──────────────────────────────────────────────────────────────

/// Print an error with context and terminate the process.
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(1);
    }};
}

/// Directory that contains the running executable.
fn exe_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot determine exe path")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("executable must live in some directory")
}

/// Load `default.toml` and layer the environment on top.
fn load_config(exe_dir: &Path) -> anyhow::Result<GuardConfig> {
    let path = exe_dir.join(CONFIG_FILE);
    let mut cfg = config::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    config::apply_env_overrides(&mut cfg).context("applying NATIVE_GUARD_* overrides")?;
    Ok(cfg)
}

fn level_filter(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Configure global logging as requested in `cfg.logging`.
fn setup_logging(exe_dir: &Path, cfg: &GuardConfig) -> Result<(), fern::InitError> {
    let log_path = cfg
        .logging
        .enable
        .then(|| exe_dir.join(cfg.logging.file.as_deref().unwrap_or("guard.log")));

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level_filter(&cfg.logging.level))
        .chain(std::io::stdout());

    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

// ───── probe logic ──────────────────────────────────────────────────────────

fn run() -> i32 {
    // 1 ─ Context
    let exe_dir = exe_dir().unwrap_or_else(|e| fatal!("startup", "{:#}", e));
    let cfg = load_config(&exe_dir).unwrap_or_else(|e| fatal!("config", "{:#}", e));

    // 2 ─ Logging
    setup_logging(&exe_dir, &cfg).unwrap_or_else(|e| fatal!("logging", "{}", e));

    // 3 ─ Probe
    let prober = EnvironmentProber::new(NativeEnvironment::new(), cfg.probe.clone());
    log::info!("Probe configured: {:?}", prober.config());
    let enforcement = Enforcement::from_block_on_detection(cfg.block_on_detection);
    match assert_integrity(&prober, enforcement) {
        Ok(verdict) => {
            println!("{} {}", verdict.code(), verdict.threat());
            0
        }
        Err(violation) => {
            log::error!("Blocking: {}", violation);
            println!("{} {}", violation.verdict.code(), violation.verdict.threat());
            violation.verdict.code()
        }
    }
}

fn main() {
    process::exit(run());
}

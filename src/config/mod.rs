//! Public API for configuration

pub mod loader;
pub mod model;

// Re-export the main entrypoints:
pub use loader::{apply_env_overrides, apply_overrides, load, load_or_default, parse};
pub use model::{GuardConfig, LoggingConfig, ProbeConfig};

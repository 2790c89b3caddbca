// src/detectors/mod.rs

//! # Detectors
//!
//! Independent leaf checks. Each reads process or CPU state through a
//! [`HostEnvironment`] and answers "triggered" or "not triggered". A
//! detector that cannot conclude returns `Err`, which the prober narrows to
//! "not triggered".

pub mod debugger_flag;
pub mod exception;
pub mod remote_debugger;
pub mod timing;

use crate::config::ProbeConfig;
use crate::environment::HostEnvironment;
use crate::error::ProbeError;
use crate::verdict::Verdict;
use std::fmt;

/// The detectors, in priority order: cheapest and most certain first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    DebuggerFlag,
    RemoteDebugger,
    TimingAnomaly,
    ExceptionInterception,
}

impl Detector {
    pub const PRIORITY: [Detector; 4] = [
        Detector::DebuggerFlag,
        Detector::RemoteDebugger,
        Detector::TimingAnomaly,
        Detector::ExceptionInterception,
    ];

    /// Detectors active under `config`, in evaluation order.
    pub fn sequence(config: &ProbeConfig) -> impl Iterator<Item = Detector> + '_ {
        Self::PRIORITY
            .into_iter()
            .filter(|detector| detector.enabled(config))
    }

    pub fn enabled(self, config: &ProbeConfig) -> bool {
        match self {
            Detector::ExceptionInterception => config.enable_exception_check,
            _ => true,
        }
    }

    /// Verdict reported when this detector fires.
    pub const fn verdict(self) -> Verdict {
        match self {
            Detector::DebuggerFlag => Verdict::DebuggerFlag,
            Detector::RemoteDebugger => Verdict::RemoteDebugger,
            Detector::TimingAnomaly => Verdict::TimingAnomaly,
            Detector::ExceptionInterception => Verdict::ExceptionIntercepted,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Detector::DebuggerFlag => "debugger_flag",
            Detector::RemoteDebugger => "remote_debugger",
            Detector::TimingAnomaly => "timing_anomaly",
            Detector::ExceptionInterception => "exception_interception",
        }
    }

    pub fn run<E>(self, env: &E, config: &ProbeConfig) -> Result<bool, ProbeError>
    where
        E: HostEnvironment + ?Sized,
    {
        match self {
            Detector::DebuggerFlag => debugger_flag::detect(env),
            Detector::RemoteDebugger => remote_debugger::detect(env),
            Detector::TimingAnomaly => timing::detect(env, config),
            Detector::ExceptionInterception => exception::detect(env),
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

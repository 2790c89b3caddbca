// src/verdict.rs

//! # Verdict codes
//!
//! The closed set of integer results returned across the C boundary.
//! Codes are stable; hosts switch on the raw value.

use std::fmt;

/// Outcome of one probe run. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Verdict {
    Clean = 0,
    DebuggerFlag = 101,
    RemoteDebugger = 102,
    TimingAnomaly = 105,
    ExceptionIntercepted = 106,
}

/// Label used for codes outside the closed set.
pub const UNKNOWN_THREAT: &str = "Unknown Anomaly";

impl Verdict {
    pub const ALL: [Verdict; 5] = [
        Verdict::Clean,
        Verdict::DebuggerFlag,
        Verdict::RemoteDebugger,
        Verdict::TimingAnomaly,
        Verdict::ExceptionIntercepted,
    ];

    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn is_clean(self) -> bool {
        matches!(self, Verdict::Clean)
    }

    /// Human-readable threat label, as shown by hosts in their alerts.
    pub const fn threat(self) -> &'static str {
        match self {
            Verdict::Clean => "Clean",
            Verdict::DebuggerFlag => "Basic Debugger (PEB Flag)",
            Verdict::RemoteDebugger => "Remote Debugger (Debug Port)",
            Verdict::TimingAnomaly => "Timing Anomaly (Single-Step Latency)",
            Verdict::ExceptionIntercepted => "Exception Interception",
        }
    }

    /// Label for a raw code, falling back to [`UNKNOWN_THREAT`].
    pub fn describe(code: i32) -> &'static str {
        Verdict::try_from(code).map_or(UNKNOWN_THREAT, Verdict::threat)
    }
}

impl TryFrom<i32> for Verdict {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.threat(), self.code())
    }
}

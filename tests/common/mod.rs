//! Scriptable `HostEnvironment` shared by the integration tests.
//!
//! Every capability answers from a fixed script and counts how often it was
//! called, so tests can assert both the verdict and which detectors ran.

#![allow(dead_code)]

use native_guard::{ExceptionOutcome, HostEnvironment, ProbeError};
use std::{
    io,
    sync::atomic::{AtomicU32, Ordering},
    thread,
    time::{Duration, Instant},
};

/// Scripted answer of a boolean OS query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Fail,
}

impl Answer {
    fn resolve(self, probe: &'static str) -> Result<bool, ProbeError> {
        match self {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Fail => Err(ProbeError::QueryFailed {
                probe,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
            }),
        }
    }
}

/// How the fake counter behaves.
#[derive(Debug, Clone, Copy)]
pub enum Timing {
    /// Real monotonic nanoseconds; the workload optionally sleeps first.
    Real { delay: Option<Duration> },
    /// Reads alternate `start`, `end`, `start`, ... so every check sees one bracket.
    Fixed { start: u64, end: u64, frequency: u64 },
    /// No high-resolution counter.
    Unavailable,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub debugger_flag:   AtomicU32,
    pub remote_debugger: AtomicU32,
    pub workload:        AtomicU32,
    pub exception:       AtomicU32,
}

impl Calls {
    pub fn get(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FakeEnvironment {
    pub debugger_flag:   Answer,
    pub remote_debugger: Answer,
    pub timing:          Timing,
    pub exception:       Result<ExceptionOutcome, ()>,
    pub calls:           Calls,
    epoch:               Instant,
    counter_reads:       AtomicU32,
}

impl FakeEnvironment {
    /// Everything clean, timing driven by a real clock with no delay.
    pub fn clean() -> Self {
        Self {
            debugger_flag:   Answer::No,
            remote_debugger: Answer::No,
            timing:          Timing::Real { delay: None },
            exception:       Ok(ExceptionOutcome::HANDLED_LOCALLY),
            calls:           Calls::default(),
            epoch:           Instant::now(),
            counter_reads:   AtomicU32::new(0),
        }
    }

    pub fn with_debugger_flag(mut self, answer: Answer) -> Self {
        self.debugger_flag = answer;
        self
    }

    pub fn with_remote_debugger(mut self, answer: Answer) -> Self {
        self.remote_debugger = answer;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_exception(mut self, outcome: Result<ExceptionOutcome, ()>) -> Self {
        self.exception = outcome;
        self
    }
}

impl HostEnvironment for FakeEnvironment {
    fn debugger_flag(&self) -> Result<bool, ProbeError> {
        self.calls.debugger_flag.fetch_add(1, Ordering::SeqCst);
        self.debugger_flag.resolve("debugger_flag")
    }

    fn remote_debugger(&self) -> Result<bool, ProbeError> {
        self.calls.remote_debugger.fetch_add(1, Ordering::SeqCst);
        self.remote_debugger.resolve("remote_debugger")
    }

    fn counter_frequency(&self) -> Option<u64> {
        match self.timing {
            Timing::Real { .. } => Some(1_000_000_000),
            Timing::Fixed { frequency, .. } => Some(frequency),
            Timing::Unavailable => None,
        }
    }

    fn read_counter(&self) -> Option<u64> {
        match self.timing {
            Timing::Real { .. } => u64::try_from(self.epoch.elapsed().as_nanos()).ok(),
            Timing::Fixed { start, end, .. } => {
                let n = self.counter_reads.fetch_add(1, Ordering::SeqCst);
                Some(if n % 2 == 0 { start } else { end })
            }
            Timing::Unavailable => None,
        }
    }

    fn run_workload(&self, iterations: u32) -> u64 {
        self.calls.workload.fetch_add(1, Ordering::SeqCst);
        if let Timing::Real { delay: Some(delay) } = self.timing {
            thread::sleep(delay);
        }
        native_guard::detectors::timing::busy_work(iterations)
    }

    fn raise_probe_exception(&self) -> Result<ExceptionOutcome, ProbeError> {
        self.calls.exception.fetch_add(1, Ordering::SeqCst);
        self.exception
            .map_err(|()| ProbeError::Unsupported { probe: "exception_interception" })
    }
}

// src/detectors/timing.rs

//! # Timing-anomaly detector
//!
//! Single-stepping or breakpoint handling injects latency into work that is
//! otherwise constant-time. The detector brackets a fixed busy loop with two
//! counter reads and flags elapsed time strictly above the threshold.
//!
//! **Steps:**
//! 1. counter frequency (unavailable → not triggered)
//! 2. `start` sample
//! 3. bounded workload
//! 4. `end` sample
//! 5. elapsed µs = `(end - start) * 1_000_000 / frequency`
//! 6. triggered iff elapsed > threshold
//!
//! The threshold is environment-sensitive: slow or heavily loaded hosts can
//! overshoot it without any debugger. Tune it per deployment target.

use crate::config::ProbeConfig;
use crate::environment::HostEnvironment;
use crate::error::ProbeError;
use log::Level;
use std::hint::black_box;

const MICROS_PER_SEC: u128 = 1_000_000;

/// Two counter readings around the workload plus the counter rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub start:     u64,
    pub end:       u64,
    pub frequency: u64,
}

impl TimingSample {
    /// Bracket `env.run_workload(iterations)` with two counter reads.
    pub fn measure<E>(env: &E, iterations: u32) -> Result<Self, ProbeError>
    where
        E: HostEnvironment + ?Sized,
    {
        let frequency = env
            .counter_frequency()
            .filter(|f| *f > 0)
            .ok_or(ProbeError::TimerUnavailable)?;
        let start = env.read_counter().ok_or(ProbeError::TimerUnavailable)?;
        black_box(env.run_workload(iterations));
        let end = env.read_counter().ok_or(ProbeError::TimerUnavailable)?;
        Ok(Self { start, end, frequency })
    }

    /// Elapsed whole microseconds. A counter that went backwards counts as zero.
    pub fn elapsed_micros(&self) -> u128 {
        let ticks = u128::from(self.end.saturating_sub(self.start));
        ticks * MICROS_PER_SEC / u128::from(self.frequency.max(1))
    }

    /// Strict comparison: elapsed exactly at the threshold is clean.
    pub fn exceeds(&self, threshold_micros: u128) -> bool {
        self.elapsed_micros() > threshold_micros
    }
}

pub fn detect<E>(env: &E, config: &ProbeConfig) -> Result<bool, ProbeError>
where
    E: HostEnvironment + ?Sized,
{
    let sample = TimingSample::measure(env, config.workload_iterations)?;
    let threshold = config.threshold_micros();
    guard_log!(
        Level::Trace,
        "timing",
        "elapsed={}us threshold={}us",
        sample.elapsed_micros(),
        threshold
    );
    Ok(sample.exceeds(threshold))
}

/// Fixed, bounded LCG loop. `black_box` keeps the optimiser from folding it.
pub fn busy_work(iterations: u32) -> u64 {
    let mut state = 0u64;
    for i in 0..iterations {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(u64::from(i));
        state = black_box(state);
    }
    state
}

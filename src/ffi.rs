// src/ffi.rs

//! C-callable export.
//!
//! ```c
//! int32_t CheckEnvironment(void);
//! ```
//!
//! Returns one of 0, 101, 102, 105, 106. Never unwinds into the caller: a
//! panic inside the probe is reported as clean.

use crate::prober::EnvironmentProber;
use crate::verdict::Verdict;
use std::panic::{self, UnwindSafe};

#[unsafe(export_name = "CheckEnvironment")]
pub extern "C" fn check_environment() -> i32 {
    contain(|| EnvironmentProber::native().check())
}

/// Run `check` and map its verdict to the wire code. A panic becomes `0`.
pub(crate) fn contain<F>(check: F) -> i32
where
    F: FnOnce() -> Verdict + UnwindSafe,
{
    panic::catch_unwind(check).unwrap_or(Verdict::Clean).code()
}

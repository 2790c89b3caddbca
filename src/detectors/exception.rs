// src/detectors/exception.rs

//! Exception-consumption check.
//!
//! Raises a benign exception inside a scoped handler. If the local handler
//! never sees it, something upstream (normally a debugger) consumed it.
//!
//! Off by default: sandboxed CI hosts and some EDR products intercept
//! exceptions for unrelated reasons and produce false positives.
//!
//! Known limitation: a debugger may also stop the process at the raise or
//! hand the exception to a different continuation. Control then may not come
//! back through the expected path and the outcome is undefined.

use crate::environment::HostEnvironment;
use crate::error::ProbeError;

pub fn detect<E: HostEnvironment + ?Sized>(env: &E) -> Result<bool, ProbeError> {
    env.raise_probe_exception()
        .map(|outcome| outcome.intercepted_externally)
}

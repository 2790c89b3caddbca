// src/detectors/remote_debugger.rs

//! OS query for an attached debugger. Catches debuggers that patch the
//! in-process flag back to zero.

use crate::environment::HostEnvironment;
use crate::error::ProbeError;

pub fn detect<E: HostEnvironment + ?Sized>(env: &E) -> Result<bool, ProbeError> {
    env.remote_debugger()
}

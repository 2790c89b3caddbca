// src/detectors/debugger_flag.rs

//! In-process debugger flag. O(1) and side-effect free; trivially cleared
//! by an attacker but almost never set on a clean host.

use crate::environment::HostEnvironment;
use crate::error::ProbeError;

pub fn detect<E: HostEnvironment + ?Sized>(env: &E) -> Result<bool, ProbeError> {
    env.debugger_flag()
}

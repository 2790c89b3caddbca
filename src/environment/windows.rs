// src/environment/windows.rs

//! Win32 backend.
//!
//! * debugger flag   → `IsDebuggerPresent` (PEB `BeingDebugged`)
//! * remote debugger → `CheckRemoteDebuggerPresent` (debug port)
//! * counter         → `QueryPerformanceCounter` / `QueryPerformanceFrequency`
//! * exception probe → vectored handler + `RaiseException(DBG_CONTROL_C)`
//!
//! A debugger sees `DBG_CONTROL_C` as a first-chance event and usually
//! swallows it, so the vectored handler never runs. Without a debugger the
//! handler observes it and resumes execution.

use super::{ExceptionOutcome, HostEnvironment};
use crate::error::ProbeError;
use std::{cell::Cell, ffi::c_void};
use windows_sys::Win32::{
    Foundation::BOOL,
    System::{
        Diagnostics::Debug::{
            AddVectoredExceptionHandler, CheckRemoteDebuggerPresent, IsDebuggerPresent,
            RaiseException, RemoveVectoredExceptionHandler, EXCEPTION_POINTERS,
        },
        Performance::{QueryPerformanceCounter, QueryPerformanceFrequency},
        Threading::GetCurrentProcess,
    },
};

/// `DBG_CONTROL_C`, continuable and inert when nobody is attached.
const PROBE_EXCEPTION_CODE: u32 = 0x4001_0005;
const EXCEPTION_CONTINUE_EXECUTION: i32 = -1;
const EXCEPTION_CONTINUE_SEARCH:    i32 = 0;

thread_local! {
    // Set by the handler on the raising thread only.
    static HANDLER_OBSERVED: Cell<bool> = const { Cell::new(false) };
}

/// Live process state via Win32.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEnvironment;

impl NativeEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl HostEnvironment for NativeEnvironment {
    fn debugger_flag(&self) -> Result<bool, ProbeError> {
        Ok(unsafe { IsDebuggerPresent() } != 0)
    }

    fn remote_debugger(&self) -> Result<bool, ProbeError> {
        let mut present: BOOL = 0;
        // GetCurrentProcess returns a pseudo-handle; nothing to close.
        let ok = unsafe { CheckRemoteDebuggerPresent(GetCurrentProcess(), &mut present) };
        if ok == 0 {
            return Err(ProbeError::last_os_error("remote_debugger"));
        }
        Ok(present != 0)
    }

    fn counter_frequency(&self) -> Option<u64> {
        let mut freq: i64 = 0;
        let ok = unsafe { QueryPerformanceFrequency(&mut freq) };
        (ok != 0 && freq > 0).then_some(freq as u64)
    }

    fn read_counter(&self) -> Option<u64> {
        let mut now: i64 = 0;
        let ok = unsafe { QueryPerformanceCounter(&mut now) };
        (ok != 0 && now >= 0).then_some(now as u64)
    }

    fn raise_probe_exception(&self) -> Result<ExceptionOutcome, ProbeError> {
        let _handler = VectoredHandler::install()?;
        HANDLER_OBSERVED.with(|seen| seen.set(false));

        unsafe { RaiseException(PROBE_EXCEPTION_CODE, 0, 0, std::ptr::null()) };

        // Reaching this line with the flag unset means something upstream of
        // our handler consumed the exception and resumed us.
        let observed = HANDLER_OBSERVED.with(Cell::get);
        Ok(if observed {
            ExceptionOutcome::HANDLED_LOCALLY
        } else {
            ExceptionOutcome::INTERCEPTED
        })
    }
}

/// RAII registration of [`probe_handler`]; removed on drop.
struct VectoredHandler {
    handle: *mut c_void,
}

impl VectoredHandler {
    fn install() -> Result<Self, ProbeError> {
        // first = 1: run before any other vectored handler
        let handle = unsafe { AddVectoredExceptionHandler(1, Some(probe_handler)) };
        if handle.is_null() {
            return Err(ProbeError::last_os_error("exception_interception"));
        }
        Ok(Self { handle })
    }
}

impl Drop for VectoredHandler {
    fn drop(&mut self) {
        unsafe { RemoveVectoredExceptionHandler(self.handle) };
    }
}

unsafe extern "system" fn probe_handler(info: *mut EXCEPTION_POINTERS) -> i32 {
    let code = unsafe {
        info.as_ref()
            .and_then(|pointers| pointers.ExceptionRecord.as_ref())
            .map(|record| record.ExceptionCode as u32)
    };
    if code != Some(PROBE_EXCEPTION_CODE) {
        return EXCEPTION_CONTINUE_SEARCH;
    }
    HANDLER_OBSERVED.with(|seen| seen.set(true));
    EXCEPTION_CONTINUE_EXECUTION
}

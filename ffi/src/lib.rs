//! C-ABI wrapper around `httpoison-core`.
//!
//! # Overview
//! Exposes `RequestExecutor` through `extern "C"` functions so any language
//! with a C FFI can issue JSON requests without linking to serde or an HTTP
//! stack directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The request body crosses the boundary as JSON text; text that does not
//!   parse is reported as an encoding error before any network action.
//! - A single `FfiResult` envelope conveys either the response or an error.
//! - The C caller owns all returned pointers and must call the matching
//!   `httpoison_*_free` function to release them.

pub mod types;

use std::panic::{catch_unwind, AssertUnwindSafe};

use httpoison_core::RequestExecutor;

use types::*;

// ---------------------------------------------------------------------------
// Executor lifecycle
// ---------------------------------------------------------------------------

/// Create an executor that logs at most `max_log_chars` characters of each
/// body.
///
/// Returns null if the HTTP client cannot be initialised or an internal panic
/// occurs. The caller must free the returned pointer with
/// `httpoison_executor_free`.
#[unsafe(no_mangle)]
pub extern "C" fn httpoison_executor_new(max_log_chars: u32) -> *mut FfiExecutor {
    catch_unwind(|| {
        // Saturates on targets where usize is narrower than u32.
        let max_log_chars = usize::try_from(max_log_chars).unwrap_or(usize::MAX);
        match RequestExecutor::new(max_log_chars) {
            Ok(executor) => Box::into_raw(Box::new(FfiExecutor { inner: executor })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an executor created by `httpoison_executor_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn httpoison_executor_free(executor: *mut FfiExecutor) {
    if !executor.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(executor) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute `request`, blocking until the full response has been read.
///
/// Never returns null. The caller must free the result with
/// `httpoison_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn httpoison_execute(executor: *const FfiExecutor, request: *const FfiRequest) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if executor.is_null() {
            return FfiResult::null_arg("executor");
        }
        if request.is_null() {
            return FfiResult::null_arg("request");
        }
        let executor = unsafe { &*executor };
        let request = match unsafe { (*request).to_core() } {
            Ok(req) => req,
            Err(e) => return FfiResult::from_input_error(e),
        };
        match executor.inner.execute(&request) {
            Ok(response) => FfiResult::ok(response),
            Err(e) => FfiResult::from_error(&e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in httpoison_execute"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResult` returned by `httpoison_execute`, including its body,
/// headers and message. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn httpoison_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| unsafe { types::free_result(result) }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Inputs (`FfiRequest`, `FfiPair`) are owned by the C caller and only read
//! here. Outputs (`FfiResult`, `FfiHeader`, the body buffer) are allocated here
//! and released by `httpoison_free_result`. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use httpoison_core::{Error, Headers, Request, RequestExecutor, Response};

/// Opaque handle to a `RequestExecutor`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiExecutor {
    pub(crate) inner: RequestExecutor,
}

// ---------------------------------------------------------------------------
// Request input (caller-provided, not freed by us)
// ---------------------------------------------------------------------------

/// A name/value pair of borrowed C strings. Used for headers and query
/// parameters; a name may appear more than once.
#[repr(C)]
pub struct FfiPair {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// The request to execute.
///
/// `method` and `url` must be non-null (an empty method means `GET`).
/// `body_json` may be null for no body; otherwise it must be JSON text.
/// `headers`/`params` may be null only when their length is zero.
#[repr(C)]
pub struct FfiRequest {
    pub method: *const c_char,
    pub url: *const c_char,
    pub body_json: *const c_char,
    pub headers: *const FfiPair,
    pub headers_len: usize,
    pub params: *const FfiPair,
    pub params_len: usize,
    pub log_request_body: bool,
    pub log_response_body: bool,
}

/// Why an `FfiRequest` could not be turned into a core `Request`.
#[derive(Debug)]
pub(crate) enum InputError {
    NullArg(&'static str),
    InvalidArg(String),
    Encoding(String),
}

impl FfiRequest {
    /// Read the caller's request into owned core types.
    ///
    /// # Safety
    /// Every non-null pointer must point to a valid NUL-terminated string or,
    /// for pair arrays, to at least `*_len` initialized `FfiPair`s.
    pub(crate) unsafe fn to_core(&self) -> Result<Request, InputError> {
        let method = unsafe { read_str(self.method, "method") }?;
        let url = unsafe { read_str(self.url, "url") }?;

        let body = if self.body_json.is_null() {
            None
        } else {
            let text = unsafe { read_str(self.body_json, "body_json") }?;
            let value: serde_json::Value =
                serde_json::from_str(text).map_err(|e| InputError::Encoding(format!("body_json: {e}")))?;
            Some(value)
        };

        Ok(Request {
            method: method.to_string(),
            url: url.to_string(),
            body,
            headers: unsafe { read_pairs(self.headers, self.headers_len, "headers") }?,
            params: unsafe { read_pairs(self.params, self.params_len, "params") }?,
            log_request_body: self.log_request_body,
            log_response_body: self.log_response_body,
        })
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, name: &'static str) -> Result<&'a str, InputError> {
    if ptr.is_null() {
        return Err(InputError::NullArg(name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| InputError::InvalidArg(format!("{name}: {e}")))
}

unsafe fn read_pairs(ptr: *const FfiPair, len: usize, name: &'static str) -> Result<Headers, InputError> {
    let mut pairs = Headers::new();
    if len == 0 {
        return Ok(pairs);
    }
    if ptr.is_null() {
        return Err(InputError::NullArg(name));
    }
    for pair in unsafe { std::slice::from_raw_parts(ptr, len) } {
        let key = unsafe { read_str(pair.key, name) }?;
        let value = unsafe { read_str(pair.value, name) }?;
        pairs.entry(key.to_string()).or_default().push(value.to_string());
    }
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Encoding = 1,
    Transport = 2,
    Panic = 3,
    NullArg = 4,
    InvalidArg = 5,
}

/// A single response header, owned by the enclosing `FfiResult`.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// Result envelope for `httpoison_execute`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and the response
/// fields are populated. `body` is null when the response body is empty.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and the response fields are zero/null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub status_code: u16,
    pub body: *mut u8,
    pub body_len: usize,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
}

impl FfiResult {
    /// Build a success result from a core `Response`. Repeated header values
    /// become repeated `FfiHeader` entries.
    pub(crate) fn ok(response: Response<'_>) -> *mut Self {
        let (body, body_len) = if response.body.is_empty() {
            (std::ptr::null_mut(), 0)
        } else {
            let boxed = response.body.into_boxed_slice();
            let len = boxed.len();
            (Box::into_raw(boxed) as *mut u8, len)
        };

        let ffi_headers: Vec<FfiHeader> = response
            .headers
            .into_iter()
            .flat_map(|(key, values)| values.into_iter().map(move |value| (key.clone(), value)))
            .map(|(key, value)| FfiHeader {
                key: c_string(key),
                value: c_string(value),
            })
            .collect();
        let headers_len = ffi_headers.len();
        let headers = if ffi_headers.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            status_code: response.status_code,
            body,
            body_len,
            headers,
            headers_len,
        }))
    }

    /// Build an error result from a core `Error`.
    pub(crate) fn from_error(err: &Error) -> *mut Self {
        let code = match err {
            Error::Encoding(_) => FfiErrorCode::Encoding,
            Error::Transport(_) => FfiErrorCode::Transport,
        };
        Self::failure(code, err.to_string())
    }

    pub(crate) fn from_input_error(err: InputError) -> *mut Self {
        match err {
            InputError::NullArg(name) => Self::null_arg(name),
            InputError::InvalidArg(msg) => Self::failure(FfiErrorCode::InvalidArg, format!("invalid argument: {msg}")),
            InputError::Encoding(msg) => Self::failure(FfiErrorCode::Encoding, format!("encoding failed: {msg}")),
        }
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: c_string(msg),
            status_code: 0,
            body: std::ptr::null_mut(),
            body_len: 0,
            headers: std::ptr::null_mut(),
            headers_len: 0,
        }))
    }
}

/// Interior NULs cannot cross into C; such strings become empty.
fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Release everything an `FfiResult` owns, then the result itself.
///
/// # Safety
/// `result` must come from one of the `FfiResult` constructors above and not
/// have been freed already.
pub(crate) unsafe fn free_result(result: *mut FfiResult) {
    let result = unsafe { Box::from_raw(result) };
    if !result.error_message.is_null() {
        drop(unsafe { CString::from_raw(result.error_message) });
    }
    if !result.body.is_null() {
        let slice = std::ptr::slice_from_raw_parts_mut(result.body, result.body_len);
        drop(unsafe { Box::from_raw(slice) });
    }
    if !result.headers.is_null() {
        let slice = std::ptr::slice_from_raw_parts_mut(result.headers, result.headers_len);
        let headers = unsafe { Box::from_raw(slice) };
        for h in headers.iter() {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    }
}

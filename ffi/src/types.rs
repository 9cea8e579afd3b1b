//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core value but uses C-compatible representations:
//! `*mut c_char` instead of `String` and explicit enum discriminants.
//! Conversion helpers live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use tradedoubler_core::TransportError;

/// Opaque handle to a `ProductsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiProductsClient {
    pub(crate) inner: tradedoubler_core::ProductsClient,
}

/// Error codes returned in `FfiSearchResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// The API answered with a status other than 200.
    HttpStatus = 1,
    /// The raw response had no header/body boundary or no status line.
    MalformedResponse = 2,
    NullArg = 3,
    Panic = 4,
}

/// Result envelope for `tdpo_parse_search_response`.
///
/// On success `error_code` is `Ok`, `http_status` is 200 and `body` holds
/// the payload. On a non-200 status `error_code` is `HttpStatus`,
/// `http_status` carries the code, `error_message` the classified reason and
/// `body` is null. Other failures leave `http_status` at 0.
#[repr(C)]
pub struct FfiSearchResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiSearchResult {
    pub(crate) fn ok(status: u16, body: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, status, Some(body))
    }

    pub(crate) fn http_status(status: u16, message: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::HttpStatus, Some(message), status, None)
    }

    pub(crate) fn from_error(err: TransportError) -> *mut Self {
        Self::boxed(FfiErrorCode::MalformedResponse, Some(&err.to_string()), 0, None)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(&format!("null argument: {name}")), 0, None)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg), 0, None)
    }

    fn boxed(
        error_code: FfiErrorCode,
        message: Option<&str>,
        http_status: u16,
        body: Option<String>,
    ) -> *mut Self {
        let result = Box::new(FfiSearchResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            body: body.as_deref().map_or(std::ptr::null_mut(), into_c_string),
        });
        Box::into_raw(result)
    }
}

/// Hand a Rust string to C. Interior NULs truncate the string there.
pub(crate) fn into_c_string(s: &str) -> *mut c_char {
    let bytes = s.split('\0').next().unwrap_or_default();
    CString::new(bytes).unwrap_or_default().into_raw()
}

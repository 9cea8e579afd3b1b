//! C-ABI wrapper around `tradedoubler-core`.
//!
//! # Overview
//! Exposes URL building and response classification through `extern "C"`
//! functions so a host in any language can perform the HTTP call itself and
//! let the core decide what the response means.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Query keys cross the boundary as a JSON object; key order in the text is
//!   the segment order in the URL.
//! - The C caller owns all returned pointers and must call the matching
//!   `tdpo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use tradedoubler_core::{decode_json, QueryKeys};

use types::*;

/// Borrow a C string as UTF-8. Null or invalid UTF-8 yields `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client with the default configuration (public API host, demo
/// token, version 1.0, default format).
///
/// The caller must free the returned pointer with `tdpo_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_client_new() -> *mut FfiProductsClient {
    catch_unwind(|| {
        let client = tradedoubler_core::ProductsClient::new();
        Box::into_raw(Box::new(FfiProductsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `tdpo_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_client_free(client: *mut FfiProductsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Replace token and version and select the response format.
///
/// `format` may be null; anything other than `".xml"` or `".json"` selects
/// the default format. Returns `client` for chaining, or null if `client`,
/// `token` or `version` is null.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_client_configure(
    client: *mut FfiProductsClient,
    token: *const c_char,
    version: *const c_char,
    format: *const c_char,
) -> *mut FfiProductsClient {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(token), Some(version)) = (read_str(token), read_str(version)) else {
            return std::ptr::null_mut();
        };
        let format = read_str(format).unwrap_or("");
        let handle = unsafe { &mut *client };
        handle.inner.configure(token, version, format);
        client
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Point the client at another host, e.g. a local mock server.
///
/// Returns false if either argument is null or not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_client_set_host(client: *mut FfiProductsClient, host: *const c_char) -> bool {
    catch_unwind(|| {
        if client.is_null() {
            return false;
        }
        let Some(host) = read_str(host) else {
            return false;
        };
        let handle = unsafe { &mut *client };
        let config = handle.inner.config().clone().with_host(host);
        handle.inner = tradedoubler_core::ProductsClient::with_config(config);
        true
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Build the search URL for `query_json`, a JSON object of query keys whose
/// values are strings, numbers or arrays of those.
///
/// A null `query_json` means no filters. Returns null if `client` is null or
/// the JSON is invalid. Free the result with `tdpo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_build_search_url(
    client: *const FfiProductsClient,
    query_json: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let keys = if query_json.is_null() {
            QueryKeys::new()
        } else {
            let Some(text) = read_str(query_json) else {
                return std::ptr::null_mut();
            };
            match serde_json::from_str::<QueryKeys>(text) {
                Ok(keys) => keys,
                Err(_) => return std::ptr::null_mut(),
            }
        };
        let client = unsafe { &*client };
        into_c_string(&client.inner.build_search_url(&keys))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Classify a raw response (headers, CRLF CRLF, body) and record its outcome
/// on the client.
///
/// Free the result with `tdpo_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_parse_search_response(
    client: *mut FfiProductsClient,
    raw: *const c_char,
) -> *mut FfiSearchResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiSearchResult::null_arg("client");
        }
        if raw.is_null() {
            return FfiSearchResult::null_arg("raw");
        }
        let raw = unsafe { CStr::from_ptr(raw) }.to_string_lossy();
        let client = unsafe { &mut *client };
        match client.inner.parse_search_response(&raw) {
            Ok(Some(body)) => FfiSearchResult::ok(200, body),
            Ok(None) => match client.inner.last_outcome() {
                Some(outcome) => FfiSearchResult::http_status(outcome.status, outcome.message()),
                None => FfiSearchResult::panic("outcome missing after parse"),
            },
            Err(e) => FfiSearchResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiSearchResult::panic("panic in tdpo_parse_search_response"))
}

/// Status code of the last parsed response, or 0 if none.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_last_status(client: *const FfiProductsClient) -> u16 {
    catch_unwind(|| {
        if client.is_null() {
            return 0;
        }
        let client = unsafe { &*client };
        client.inner.last_outcome().map_or(0, |o| o.status)
    })
    .unwrap_or(0)
}

/// Message for the last parsed response, or null if none.
/// Free the result with `tdpo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_last_message(client: *const FfiProductsClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        client
            .inner
            .last_outcome()
            .map_or(std::ptr::null_mut(), |o| into_c_string(o.message()))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse `text` as JSON and return it re-serialized.
///
/// Returns null for null input, blank text, JSON `null` or invalid JSON.
/// Free the result with `tdpo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_decode_json(text: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let Some(text) = read_str(text) else {
            return std::ptr::null_mut();
        };
        match decode_json(text) {
            Ok(value) => into_c_string(&value.to_string()),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiSearchResult` returned by `tdpo_parse_search_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_free_result(result: *mut FfiSearchResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tdpo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

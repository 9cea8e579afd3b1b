//! Raw HTTP response framing for the host-does-IO pattern.
//!
//! # Design
//! The transport hands back the response as one string: header block, a
//! blank line (CRLF CRLF), then the body. `RawResponse::split` cuts it at the
//! first blank line. When the response went through a proxy or the server
//! sent `100 Continue`, the text starts with an interim header block followed
//! by the real one; those interim blocks are skipped so the classifier sees
//! the origin's status.

use crate::error::TransportError;

const BOUNDARY: &str = "\r\n\r\n";

/// A response cut into its header block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub header: String,
    pub body: String,
}

impl RawResponse {
    pub fn split(raw: &str) -> Result<Self, TransportError> {
        let mut rest = raw;
        loop {
            let (header, body) = rest.split_once(BOUNDARY).ok_or(TransportError::MissingBoundary)?;
            if is_interim(header) && body.starts_with("HTTP/") {
                rest = body;
                continue;
            }
            return Ok(RawResponse {
                header: header.to_string(),
                body: body.to_string(),
            });
        }
    }
}

fn is_interim(header: &str) -> bool {
    let status_line = header.lines().next().unwrap_or("");
    status_line.to_ascii_lowercase().contains("connection established")
        || parse_status_line(header).is_ok_and(|status| (100..200).contains(&status))
}

/// Extract the status code from `HTTP/<version> <code> [reason]`.
pub fn parse_status_line(header: &str) -> Result<u16, TransportError> {
    let line = header.lines().next().unwrap_or("");
    let malformed = || TransportError::MalformedStatusLine(line.to_string());

    let mut parts = line.split_whitespace();
    let version = parts.next().ok_or_else(malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let code = parts.next().ok_or_else(malformed)?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    code.parse().map_err(|_| malformed())
}

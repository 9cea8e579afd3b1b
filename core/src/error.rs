//! Error types for the products client.
//!
//! # Design
//! Three layers, matching where a request can go wrong:
//!
//! - `TransportError`: the GET itself failed or the raw response could not be
//!   framed into header and body.
//! - `DecodeError`: a 200 body could not be turned into data.
//! - `ApiError`: umbrella for `fetch_products`, which also reports non-200
//!   outcomes as `Http`. `search` never returns `Http`; it records the outcome
//!   on the client and returns `Ok(None)`.

use thiserror::Error;

use crate::config::ResponseFormat;
use crate::outcome::ResponseOutcome;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport could not complete the GET.
    #[error("request failed: {0}")]
    Request(#[source] BoxError),

    /// No CRLF CRLF separates the header block from the body.
    #[error("response has no header/body boundary")]
    MissingBoundary,

    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
}

impl TransportError {
    pub fn request(err: impl Into<BoxError>) -> Self {
        TransportError::Request(err.into())
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Blank text or a JSON `null`.
    #[error("response body is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} responses cannot be decoded as JSON")]
    UnsupportedFormat(ResponseFormat),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {}: {}", .0.status, .0.message())]
    Http(ResponseOutcome),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_shows_status_and_message() {
        let err = ApiError::Http(ResponseOutcome::from_status(404));
        assert_eq!(err.to_string(), "HTTP 404: the URL does not exist");
    }

    #[test]
    fn request_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::request(io);
        assert_eq!(err.to_string(), "request failed: refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unsupported_format_names_format() {
        let err = DecodeError::UnsupportedFormat(ResponseFormat::Xml);
        assert_eq!(err.to_string(), "xml responses cannot be decoded as JSON");
    }
}

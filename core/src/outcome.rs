//! Status code classification.
//!
//! Only the codes the products API documents get their own kind; every other
//! code, including other 2xx, is `Unknown`.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::http::parse_status_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    BadFormat,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    UnsupportedMediaType,
    ServerOffline,
    Unknown,
}

impl OutcomeKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => OutcomeKind::Success,
            400 => OutcomeKind::BadFormat,
            404 => OutcomeKind::NotFound,
            405 => OutcomeKind::MethodNotAllowed,
            406 => OutcomeKind::NotAcceptable,
            415 => OutcomeKind::UnsupportedMediaType,
            500 => OutcomeKind::ServerOffline,
            _ => OutcomeKind::Unknown,
        }
    }

    /// Lowercase fragment without trailing punctuation, so it reads well
    /// inside `ApiError`'s `HTTP {status}: {message}`.
    pub fn message(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::BadFormat => "invalid XML, JSON or date format",
            OutcomeKind::NotFound => "the URL does not exist",
            OutcomeKind::MethodNotAllowed => "invalid HTTP method",
            OutcomeKind::NotAcceptable => "requested an invalid content type",
            OutcomeKind::UnsupportedMediaType => "sent an invalid content type",
            OutcomeKind::ServerOffline => "the API service is offline",
            OutcomeKind::Unknown => "unknown error",
        }
    }
}

/// The classified status of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    pub status: u16,
    pub kind: OutcomeKind,
}

impl ResponseOutcome {
    pub fn from_status(status: u16) -> Self {
        Self {
            status,
            kind: OutcomeKind::from_status(status),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Classify a response header block by its status line.
pub fn classify(header: &str) -> Result<ResponseOutcome, TransportError> {
    parse_status_line(header).map(ResponseOutcome::from_status)
}

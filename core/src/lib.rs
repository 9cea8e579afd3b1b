//! Synchronous client core for the TradeDoubler Products API.
//!
//! # Overview
//! Builds search URLs in the API's `;key=value` path-segment style, hands
//! them to a caller-supplied transport, and classifies the raw response by
//! its status line. The body comes back untouched on success; decoding is a
//! separate step.
//!
//! # Design
//! - `ProductsClient` is a scoped instance: configuration and the last
//!   response outcome live on it and change only through `&mut self`.
//! - The network is behind the `Transport` trait. `UreqTransport` (feature
//!   `ureq`, on by default) is the stock implementation; tests pass closures.
//! - Each search step is also available on its own (`build_search_url`,
//!   `parse_search_response`) for hosts that perform the HTTP call
//!   themselves, such as the C ABI in the `ffi` crate.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod outcome;
pub mod query;
pub mod request;
pub mod transport;
pub mod types;

pub use client::ProductsClient;
pub use config::{Configuration, ListEncoding, ResponseFormat};
pub use decode::{decode_json, decode_products};
pub use error::{ApiError, DecodeError, TransportError};
pub use http::RawResponse;
pub use outcome::{classify, OutcomeKind, ResponseOutcome};
pub use query::{QueryKeys, QueryValue};
pub use request::build_url;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Category, Offer, Price, PriceEntry, Product, ProductHeader, ProductsPage};

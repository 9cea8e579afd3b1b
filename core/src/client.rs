//! Products search client.
//!
//! # Design
//! `ProductsClient` owns a `Configuration` and the outcome of the most recent
//! response. A search is split into `build_search_url`, which produces the
//! URL, and `parse_search_response`, which consumes the raw response text.
//! `search` glues the two around a caller-supplied `Transport`; hosts that do
//! their own IO call the halves directly.
//!
//! Non-200 responses are not errors at the `search` boundary. They yield
//! `Ok(None)` and leave the classified reason in `last_outcome`.
//! `fetch_products` is the strict variant that turns them into
//! `ApiError::Http`.
//!
//! Both configuration and last outcome change through `&mut self`, so one
//! instance cannot be driven from two threads without a lock.

use tracing::{debug, debug_span, warn};
use uuid::Uuid;

use crate::config::Configuration;
use crate::decode::decode_products;
use crate::error::{ApiError, DecodeError, TransportError};
use crate::http::RawResponse;
use crate::outcome::{classify, ResponseOutcome};
use crate::query::QueryKeys;
use crate::request::build_url;
use crate::transport::Transport;
use crate::types::ProductsPage;

#[derive(Debug, Clone, Default)]
pub struct ProductsClient {
    config: Configuration,
    last_outcome: Option<ResponseOutcome>,
}

impl ProductsClient {
    /// Client with the default configuration (public host, demo token).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Configuration) -> Self {
        Self {
            config,
            last_outcome: None,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// See [`Configuration::configure`].
    pub fn configure(
        &mut self,
        token: impl Into<String>,
        version: impl Into<String>,
        format: &str,
    ) -> &mut Self {
        self.config.configure(token, version, format);
        self
    }

    /// Outcome of the last response parsed by this client.
    pub fn last_outcome(&self) -> Option<&ResponseOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn build_search_url(&self, keys: &QueryKeys) -> String {
        build_url(&self.config, keys)
    }

    /// Frame and classify a raw response, recording its outcome.
    ///
    /// Returns the body unchanged on 200 and `None` on any other status.
    pub fn parse_search_response(&mut self, raw: &str) -> Result<Option<String>, TransportError> {
        let (outcome, body) = self.record(raw)?;
        Ok(outcome.is_success().then_some(body))
    }

    /// Run a search through `transport`.
    ///
    /// Transport and framing errors propagate; any non-200 status yields
    /// `Ok(None)` with the reason available from [`last_outcome`](Self::last_outcome).
    pub fn search<T>(&mut self, transport: &T, keys: &QueryKeys) -> Result<Option<String>, TransportError>
    where
        T: Transport + ?Sized,
    {
        let (outcome, body) = self.execute(transport, keys)?;
        Ok(outcome.is_success().then_some(body))
    }

    /// Run a search and decode the typed products page.
    ///
    /// Fails before any request is sent when the configured format is XML.
    pub fn fetch_products<T>(&mut self, transport: &T, keys: &QueryKeys) -> Result<ProductsPage, ApiError>
    where
        T: Transport + ?Sized,
    {
        let format = self.config.response_format;
        if !format.is_json() {
            return Err(DecodeError::UnsupportedFormat(format).into());
        }
        let (outcome, body) = self.execute(transport, keys)?;
        if !outcome.is_success() {
            return Err(ApiError::Http(outcome));
        }
        Ok(decode_products(&body)?)
    }

    fn execute<T>(&mut self, transport: &T, keys: &QueryKeys) -> Result<(ResponseOutcome, String), TransportError>
    where
        T: Transport + ?Sized,
    {
        let request_id = Uuid::new_v4();
        let span = debug_span!("search", %request_id);
        let _guard = span.enter();

        let url = self.build_search_url(keys);
        debug!(url = %redact_token(&url), keys = keys.len(), "performing GET");
        let raw = transport.perform_get(&url)?;
        self.record(&raw)
    }

    fn record(&mut self, raw: &str) -> Result<(ResponseOutcome, String), TransportError> {
        let response = RawResponse::split(raw).inspect_err(|err| warn!(%err, "malformed response"))?;
        let outcome = classify(&response.header).inspect_err(|err| warn!(%err, "malformed response"))?;
        self.last_outcome = Some(outcome);

        if outcome.is_success() {
            debug!(status = outcome.status, bytes = response.body.len(), "search succeeded");
        } else {
            warn!(status = outcome.status, message = outcome.message(), "search failed");
        }
        Ok((outcome, response.body))
    }
}

fn redact_token(url: &str) -> &str {
    url.split_once("?token=").map_or(url, |(head, _)| head)
}

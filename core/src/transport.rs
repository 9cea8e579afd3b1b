//! The GET capability the client is handed.
//!
//! Implementations return the whole response as text in raw framing: status
//! line, headers, CRLF CRLF, body. Any `Fn(&str) -> Result<String, _>` is a
//! transport, which is how tests script responses.

use crate::error::TransportError;

pub trait Transport {
    fn perform_get(&self, url: &str) -> Result<String, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<String, TransportError>,
{
    fn perform_get(&self, url: &str) -> Result<String, TransportError> {
        self(url)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::Duration;

    use ureq::Agent;

    use super::Transport;
    use crate::error::TransportError;

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// A full page of 10000 products runs to tens of MiB of JSON.
    const DEFAULT_BODY_LIMIT: u64 = 256 * 1024 * 1024;

    /// Blocking transport on a `ureq` agent.
    ///
    /// 4xx/5xx responses come back as data so the client can classify them.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
        body_limit: u64,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new(Some(DEFAULT_TIMEOUT))
        }
    }

    impl UreqTransport {
        /// `timeout` bounds the whole call; `None` waits indefinitely.
        pub fn new(timeout: Option<Duration>) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self {
                agent,
                body_limit: DEFAULT_BODY_LIMIT,
            }
        }

        /// Largest body accepted, in bytes. Longer bodies fail with
        /// `TransportError::Request`.
        pub fn with_body_limit(mut self, limit: u64) -> Self {
            self.body_limit = limit;
            self
        }
    }

    impl Transport for UreqTransport {
        fn perform_get(&self, url: &str) -> Result<String, TransportError> {
            let mut response = self.agent.get(url).call().map_err(TransportError::request)?;

            let mut raw = format!("{:?} {}\r\n", response.version(), response.status());
            for (name, value) in response.headers() {
                raw.push_str(name.as_str());
                raw.push_str(": ");
                raw.push_str(value.to_str().unwrap_or_default());
                raw.push_str("\r\n");
            }
            raw.push_str("\r\n");

            let body = response
                .body_mut()
                .with_config()
                .limit(self.body_limit)
                .read_to_string()
                .map_err(TransportError::request)?;
            raw.push_str(&body);
            Ok(raw)
        }
    }
}

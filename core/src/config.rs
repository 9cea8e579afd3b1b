//! Client configuration: token, API version, response format and the
//! list-encoding policy used by the request builder.
//!
//! # Design
//! `Configuration` is a plain value. The client owns one and mutates it only
//! through `configure`; everything else builds a fresh value with the
//! `with_*` methods. The format selector is normalized on the way in, so the
//! rest of the crate only ever sees the closed `ResponseFormat` set.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Host prefix every request URL starts with.
pub const DEFAULT_HOST: &str = "https://api.tradedoubler.com/";

/// Public demo token. Replace it with the token from your own account.
pub const DEFAULT_TOKEN: &str = "6523B0E2C339018570FF54856DF193523332D60F";

pub const DEFAULT_API_VERSION: &str = "1.0";

/// Response format requested through the resource suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// No suffix; the API answers with JSON.
    #[default]
    Default,
    Xml,
    Json,
}

impl ResponseFormat {
    /// Normalize a raw selector. Only `".xml"` and `".json"` are recognized;
    /// anything else means `Default`.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            ".xml" => ResponseFormat::Xml,
            ".json" => ResponseFormat::Json,
            _ => ResponseFormat::Default,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ResponseFormat::Default => "",
            ResponseFormat::Xml => ".xml",
            ResponseFormat::Json => ".json",
        }
    }

    pub fn is_json(self) -> bool {
        !matches!(self, ResponseFormat::Xml)
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Default => write!(f, "default"),
            ResponseFormat::Xml => write!(f, "xml"),
            ResponseFormat::Json => write!(f, "json"),
        }
    }
}

/// How list-valued query keys are percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEncoding {
    /// Elements encoded once and joined with an encoded comma (`%2C`).
    #[default]
    Single,
    /// Elements encoded, joined with a literal comma, and the joined string
    /// encoded again. Matches older clients that produce `%2520` for spaces.
    Double,
}

impl ListEncoding {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(ListEncoding::Single),
            "double" => Some(ListEncoding::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Scheme and host, always ending in `/`.
    pub host: String,
    pub token: String,
    pub api_version: String,
    pub response_format: ResponseFormat,
    pub list_encoding: ListEncoding,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            response_format: ResponseFormat::Default,
            list_encoding: ListEncoding::Single,
        }
    }
}

impl Configuration {
    /// Replace token and version, and set the format from a raw selector.
    ///
    /// Nothing is validated; any token or version string is accepted.
    pub fn configure(
        &mut self,
        token: impl Into<String>,
        version: impl Into<String>,
        format: &str,
    ) -> &mut Self {
        self.token = token.into();
        self.api_version = version.into();
        self.response_format = ResponseFormat::from_selector(format);
        self
    }

    /// Defaults overlaid with `TRADEDOUBLER_*` environment variables.
    ///
    /// - `TRADEDOUBLER_API_HOST`
    /// - `TRADEDOUBLER_TOKEN`
    /// - `TRADEDOUBLER_API_VERSION`
    /// - `TRADEDOUBLER_FORMAT` (`.xml`, `.json` or anything else for default)
    /// - `TRADEDOUBLER_LIST_ENCODING` (`single` or `double`)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup("TRADEDOUBLER_API_HOST") {
            config = config.with_host(host);
        }
        if let Some(token) = lookup("TRADEDOUBLER_TOKEN") {
            config.token = token;
        }
        if let Some(version) = lookup("TRADEDOUBLER_API_VERSION") {
            config.api_version = version;
        }
        if let Some(format) = lookup("TRADEDOUBLER_FORMAT") {
            config.response_format = ResponseFormat::from_selector(&format);
        }
        if let Some(encoding) = lookup("TRADEDOUBLER_LIST_ENCODING").as_deref().and_then(ListEncoding::parse) {
            config.list_encoding = encoding;
        }
        config
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let mut host = host.into();
        if !host.ends_with('/') {
            host.push('/');
        }
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    #[must_use]
    pub fn with_list_encoding(mut self, encoding: ListEncoding) -> Self {
        self.list_encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_points_at_public_api() {
        let config = Configuration::default();
        assert_eq!(config.host, "https://api.tradedoubler.com/");
        assert_eq!(config.token, DEFAULT_TOKEN);
        assert_eq!(config.api_version, "1.0");
        assert_eq!(config.response_format, ResponseFormat::Default);
        assert_eq!(config.list_encoding, ListEncoding::Single);
    }

    #[test]
    fn configure_accepts_known_formats() {
        let mut config = Configuration::default();
        config.configure("abc", "2.0", ".xml");
        assert_eq!(config.token, "abc");
        assert_eq!(config.api_version, "2.0");
        assert_eq!(config.response_format, ResponseFormat::Xml);

        config.configure("abc", "2.0", ".json");
        assert_eq!(config.response_format, ResponseFormat::Json);
    }

    #[test]
    fn configure_normalizes_unknown_format_to_default() {
        let mut config = Configuration::default().with_response_format(ResponseFormat::Json);
        for selector in ["", "xml", ".XML", ".csv", "json "] {
            config.configure("t", "1.0", selector);
            assert_eq!(config.response_format, ResponseFormat::Default, "{selector:?}");
        }
    }

    #[test]
    fn configure_chains() {
        let mut config = Configuration::default();
        config.configure("a", "1.0", "").configure("b", "1.1", ".json");
        assert_eq!(config.token, "b");
        assert_eq!(config.api_version, "1.1");
    }

    #[test]
    fn with_host_appends_trailing_slash() {
        let config = Configuration::default().with_host("http://localhost:3000");
        assert_eq!(config.host, "http://localhost:3000/");
        let config = Configuration::default().with_host("http://localhost:3000/");
        assert_eq!(config.host, "http://localhost:3000/");
    }

    #[test]
    fn lookup_overlays_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TRADEDOUBLER_API_HOST", "http://127.0.0.1:9000"),
            ("TRADEDOUBLER_TOKEN", "secret"),
            ("TRADEDOUBLER_FORMAT", ".xml"),
            ("TRADEDOUBLER_LIST_ENCODING", "Double"),
        ]);
        let config = Configuration::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.host, "http://127.0.0.1:9000/");
        assert_eq!(config.token, "secret");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.response_format, ResponseFormat::Xml);
        assert_eq!(config.list_encoding, ListEncoding::Double);
    }

    #[test]
    fn lookup_ignores_unknown_list_encoding() {
        let config = Configuration::from_lookup(|name| {
            (name == "TRADEDOUBLER_LIST_ENCODING").then(|| "triple".to_string())
        });
        assert_eq!(config.list_encoding, ListEncoding::Single);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: Configuration =
            serde_json::from_str(r#"{"token":"T","response_format":"json"}"#).unwrap();
        assert_eq!(config.token, "T");
        assert_eq!(config.response_format, ResponseFormat::Json);
        assert_eq!(config.host, DEFAULT_HOST);
    }
}

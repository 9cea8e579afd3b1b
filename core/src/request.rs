//! Request URL construction.
//!
//! A products URL is three segments glued together:
//!
//! ```text
//! https://api.tradedoubler.com/1.0/products.json ;category=Shoes;id=1%2C2 ?token=T
//! '------------- base -------------------------' '------ params -------' '- auth -'
//! ```
//!
//! Filters live in `;key=value` path segments instead of an `&`-joined query
//! string, so values use RFC 3986 encoding (space is `%20`, never `+`). Keys
//! and the token are emitted verbatim.

use std::borrow::Cow;

use crate::config::{Configuration, ListEncoding};
use crate::query::{QueryKeys, QueryValue};

/// Build the full request URL for a products search.
pub fn build_url(config: &Configuration, keys: &QueryKeys) -> String {
    let mut url = base_segment(config);
    for (key, value) in keys.iter() {
        url.push_str(&encode_segment(key, value, config.list_encoding));
    }
    url.push_str("?token=");
    url.push_str(&config.token);
    url
}

/// `host + version + "/products" + format suffix`.
pub fn base_segment(config: &Configuration) -> String {
    format!(
        "{}{}/products{}",
        config.host,
        config.api_version,
        config.response_format.suffix()
    )
}

/// Encode one filter as `;key=value`.
pub fn encode_segment(key: &str, value: &QueryValue, policy: ListEncoding) -> String {
    let encoded = match value {
        QueryValue::Scalar(s) => encode(s).into_owned(),
        QueryValue::List(items) => encode_list(items, policy),
    };
    format!(";{key}={encoded}")
}

fn encode_list(items: &[String], policy: ListEncoding) -> String {
    let parts: Vec<Cow<'_, str>> = items.iter().map(|item| encode(item)).collect();
    match policy {
        ListEncoding::Single => parts.join("%2C"),
        ListEncoding::Double => encode(&parts.join(",")).into_owned(),
    }
}

/// RFC 3986 percent-encoding: unreserved characters pass, everything else is
/// `%XX`.
pub fn encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

//! Search filters passed to the products endpoint.
//!
//! # Design
//! The API reads filters from path segments in the order they appear, so
//! `QueryKeys` is an insertion-ordered list rather than a hash map. Keys stay
//! unique: inserting an existing key overwrites its value without moving it.
//! Deserialization walks the JSON object directly, which keeps document order
//! without needing an order-preserving map type.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single filter value: one string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryValue {
    fn from(values: Vec<S>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryValue {
    fn from(values: [S; N]) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

// JSON callers send numbers for keys like `pageSize`; they are stringified.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawScalar> for String {
    fn from(raw: RawScalar) -> Self {
        match raw {
            RawScalar::Text(s) => s,
            RawScalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Scalar(RawScalar),
    List(Vec<RawScalar>),
}

impl<'de> Deserialize<'de> for QueryValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Scalar(s) => QueryValue::Scalar(s.into()),
            RawValue::List(items) => QueryValue::List(items.into_iter().map(Into::into).collect()),
        })
    }
}

/// Ordered mapping from filter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryKeys {
    entries: Vec<(String, QueryValue)>,
}

impl QueryKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. An overwritten key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryKeys
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keys = QueryKeys::new();
        for (k, v) in iter {
            keys.insert(k, v);
        }
        keys
    }
}

impl Serialize for QueryKeys {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueryKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = QueryKeys;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of query keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<QueryKeys, A::Error> {
                let mut keys = QueryKeys::new();
                while let Some((key, value)) = map.next_entry::<String, QueryValue>()? {
                    keys.insert(key, value);
                }
                Ok(keys)
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

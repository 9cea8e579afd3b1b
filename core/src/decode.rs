//! Payload decoding.
//!
//! `decode_json` distinguishes "nothing there" (`Empty`) from "not JSON"
//! (`Json`). A legitimately empty object or array is data, not a failure.

use serde_json::Value;

use crate::error::DecodeError;
use crate::types::ProductsPage;

pub fn decode_json(text: &str) -> Result<Value, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Null => Err(DecodeError::Empty),
        value => Ok(value),
    }
}

pub fn decode_products(text: &str) -> Result<ProductsPage, DecodeError> {
    let value = decode_json(text)?;
    Ok(serde_json::from_value(value)?)
}

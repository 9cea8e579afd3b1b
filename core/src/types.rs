//! Typed view of a products search response.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Every field defaults when absent, since the live API omits empty ones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductsPage {
    pub product_header: ProductHeader,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductHeader {
    /// Matches before paging; the API caps this at 10000.
    pub total_hits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<Category>,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    pub program_name: Option<String>,
    pub product_url: Option<String>,
    pub price_history: Vec<PriceEntry>,
}

impl Offer {
    /// Most recent price, which the API lists first.
    pub fn current_price(&self) -> Option<&Price> {
        self.price_history.first().map(|entry| &entry.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceEntry {
    pub price: Price,
    pub date: Option<i64>,
}

/// Prices arrive as decimal strings; they are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub value: String,
    pub currency: String,
}

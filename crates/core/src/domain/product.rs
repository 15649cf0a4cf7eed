use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage-assigned identity of a row in the product reporting table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(pub i64);

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_key: ProductKey,
    pub product_name: String,
    pub category: String,
}

/// Write shape accepted by create and update. The key is never part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub product_name: String,
    pub category: String,
}

impl ProductPayload {
    pub fn new(product_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self { product_name: product_name.into(), category: category.into() }
    }

    pub fn into_product(self, product_key: ProductKey) -> Product {
        Product { product_key, product_name: self.product_name, category: self.category }
    }
}

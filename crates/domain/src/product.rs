//! Catalog product documents.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// A `products/{id}` document merged with its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Lower-cased name used for prefix search.
    #[serde(rename = "name_lower", default)]
    pub name_lower: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub max_quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_collection: Vec<serde_json::Value>,
    #[serde(default)]
    pub sizes: Vec<serde_json::Value>,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub date_added: Option<Timestamp>,
}

impl Product {
    /// A minimal product with its search fields derived from `name`.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            name_lower: name.to_lowercase(),
            keywords: name.to_lowercase().split_whitespace().map(str::to_string).collect(),
            name,
            brand: String::new(),
            price,
            max_quantity: 0,
            description: String::new(),
            image: String::new(),
            image_collection: Vec::new(),
            sizes: Vec::new(),
            available_colors: Vec::new(),
            is_featured: false,
            is_recommended: false,
            date_added: None,
        }
    }
}

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;
use crate::query::DocumentQuery;

/// A stored document and its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Deserializes the document with its key merged in as `id`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        let mut data = self.data;
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(self.id));
        }
        Ok(serde_json::from_value(data)?)
    }
}

/// Document-oriented persistence organised in named collections.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document. Returns None if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Creates or replaces a document.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Merges top-level fields into an existing document.
    ///
    /// Fails with `NotFound` if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()>;

    /// Creates a document under a generated key and returns the key.
    async fn add(&self, collection: &str, data: Value) -> Result<String>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Runs a query against a collection.
    async fn query(&self, collection: &str, query: &DocumentQuery) -> Result<Vec<Document>>;

    /// Generates a key without writing a document.
    fn generate_id(&self, collection: &str) -> String;

    /// Counts the documents in a collection.
    async fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.query(collection, &DocumentQuery::new()).await?.len())
    }
}

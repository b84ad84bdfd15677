use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::query::{Direction, DocumentQuery, OrderField, lookup, sort_order};
use crate::store::{Document, DocumentStore};
use crate::{GatewayError, Result};

type Collection = BTreeMap<String, Value>;

/// In-memory document store for testing.
///
/// Documents are kept per collection in key order. Reads can be slowed
/// down and reads or writes can be made to fail, to exercise deadline and
/// error paths of callers.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    read_latency_ms: Arc<AtomicU64>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    reads_completed: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every read by the given duration.
    pub fn set_read_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.read_latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Configures reads to fail.
    pub fn set_fail_on_read(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Configures writes to fail.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of reads that ran to completion.
    pub fn reads_completed(&self) -> usize {
        self.reads_completed.load(Ordering::SeqCst)
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    async fn before_read(&self) -> Result<()> {
        let latency = self.read_latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("read failed".to_string()));
        }
        Ok(())
    }

    fn before_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("write failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.before_read().await?;
        let store = self.collections.read().await;
        let doc = store
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone()));
        self.reads_completed.fetch_add(1, Ordering::SeqCst);
        Ok(doc)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        self.before_write()?;
        let mut store = self.collections.write().await;
        store
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.before_write()?;
        let mut store = self.collections.write().await;
        let doc = store
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| GatewayError::not_found(collection, id))?;

        match doc {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        Ok(())
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String> {
        let id = self.generate_id(collection);
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.before_write()?;
        let mut store = self.collections.write().await;
        if let Some(docs) = store.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &DocumentQuery) -> Result<Vec<Document>> {
        self.before_read().await?;
        let store = self.collections.read().await;
        let Some(docs) = store.get(collection) else {
            self.reads_completed.fetch_add(1, Ordering::SeqCst);
            return Ok(Vec::new());
        };

        // Key order is the natural order of the collection
        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|(_, data)| query.matches(data))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect();

        if let Some(order) = &query.order_by {
            if let OrderField::Field(field) = &order.field {
                matched.retain(|doc| lookup(&doc.data, field).is_some());
                matched.sort_by(|a, b| {
                    let (Some(x), Some(y)) = (lookup(&a.data, field), lookup(&b.data, field))
                    else {
                        return std::cmp::Ordering::Equal;
                    };
                    sort_order(x, y).then_with(|| a.id.cmp(&b.id))
                });
            }
            if order.direction == Direction::Descending {
                matched.reverse();
            }
        }

        if let Some(cursor) = &query.start_after {
            let by_id = query
                .order_by
                .as_ref()
                .is_none_or(|order| order.field == OrderField::DocumentId);
            matched = match matched.iter().position(|doc| &doc.id == cursor) {
                Some(pos) => matched.split_off(pos + 1),
                // The cursor document may have been deleted since the previous page
                None if by_id => matched
                    .into_iter()
                    .filter(|doc| doc.id.as_str() > cursor.as_str())
                    .collect(),
                None => matched,
            };
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        self.reads_completed.fetch_add(1, Ordering::SeqCst);
        Ok(matched)
    }

    fn generate_id(&self, _collection: &str) -> String {
        common::generate_document_id()
    }
}

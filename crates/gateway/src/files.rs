use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{GatewayError, Result};

/// Binary object storage addressed by folder and key.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores an object and returns its download URL.
    async fn put(&self, folder: &str, id: &str, bytes: Vec<u8>) -> Result<String>;

    /// Deletes an object. Fails with `NotFound` if it does not exist.
    async fn delete(&self, folder: &str, id: &str) -> Result<()>;
}

/// In-memory file storage for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored bytes for an object.
    pub fn object(&self, folder: &str, id: &str) -> Option<Vec<u8>> {
        self.objects().get(&format!("{folder}/{id}")).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects().len()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn put(&self, folder: &str, id: &str, bytes: Vec<u8>) -> Result<String> {
        let path = format!("{folder}/{id}");
        self.objects().insert(path.clone(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, folder: &str, id: &str) -> Result<()> {
        self.objects()
            .remove(&format!("{folder}/{id}"))
            .map(|_| ())
            .ok_or_else(|| GatewayError::not_found(folder, id))
    }
}

//! In-memory source provider for static collections, testing and development

use crate::core::{Record, SourceProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

/// In-memory record collection
///
/// Records are keyed by id in insertion order, so inserts and lookups stay
/// constant time. Uses RwLock for thread-safe access; clones share the
/// same collection.
#[derive(Clone)]
pub struct InMemorySource<R: Record> {
    records: Arc<RwLock<IndexMap<String, R>>>,
}

impl<R: Record> InMemorySource<R> {
    /// Create an empty in-memory source
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a source seeded with records
    ///
    /// Later records replace earlier ones with the same id.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Result<Self> {
        Ok(Self {
            records: Arc::new(RwLock::new(keyed(records))),
        })
    }

    /// Insert a record, replacing in place any record with the same id
    pub fn insert(&self, record: R) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(record.id().to_string(), record);

        Ok(())
    }

    /// Remove a record by id, keeping the order of the rest
    pub fn remove(&self, id: &str) -> Result<Option<R>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records.shift_remove(id))
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Result<Option<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    /// Replace the whole collection
    pub fn replace_all(&self, replacement: Vec<R>) -> Result<()> {
        let replacement = keyed(replacement);
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        *records = replacement;

        Ok(())
    }

    /// Copy of the current collection
    pub fn snapshot(&self) -> Result<Vec<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }
}

fn keyed<R: Record>(records: impl IntoIterator<Item = R>) -> IndexMap<String, R> {
    let mut map = IndexMap::new();
    for record in records {
        map.insert(record.id().to_string(), record);
    }
    map
}

impl<R: Record> Default for InMemorySource<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> SourceProvider<R> for InMemorySource<R> {
    async fn fetch_collection(&self) -> Result<Vec<R>> {
        self.snapshot()
    }
}

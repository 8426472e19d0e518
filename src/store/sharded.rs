//! Sharded Store Module
//!
//! Internally synchronized storage on top of DashMap.

use dashmap::DashMap;

use crate::error::Result;
use crate::store::BackingStore;

/// Unbounded backing store that locks per shard instead of globally.
///
/// Suited to many callers writing distinct albums at once. This store never
/// fails.
#[derive(Debug, Default)]
pub struct ShardedStore {
    values: DashMap<String, Vec<u8>>,
}

impl ShardedStore {
    // == Constructor ==
    /// Creates an empty sharded store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for ShardedStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.values.remove(key).is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.values.len())
    }
}

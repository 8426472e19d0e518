//! Memory Store Module
//!
//! HashMap storage behind a single RwLock, with an optional LRU bound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{BackingStore, LruTracker};

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, Vec<u8>>,
    /// Present only when the store is bounded
    lru: Option<LruTracker>,
}

// == Memory Store ==
/// In-memory backing store.
///
/// Unbounded by default: entries leave only through `delete`. A bounded
/// store evicts the least recently used key when a new key would exceed
/// `max_entries`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
    max_entries: Option<usize>,
    evictions: AtomicU64,
}

impl MemoryStore {
    // == Constructors ==
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding at most `max_entries` entries.
    ///
    /// A bound of zero is treated as unbounded.
    pub fn bounded(max_entries: usize) -> Self {
        if max_entries == 0 {
            return Self::new();
        }
        Self {
            entries: RwLock::new(Entries {
                values: HashMap::new(),
                lru: Some(LruTracker::new()),
            }),
            max_entries: Some(max_entries),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the configured bound, if any.
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>> {
        self.entries
            .read()
            .map_err(|_| CacheError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>> {
        self.entries
            .write()
            .map_err(|_| CacheError::Store("memory store lock poisoned".to_string()))
    }
}

impl BackingStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.max_entries.is_none() {
            return Ok(self.read()?.values.get(key).cloned());
        }

        // Bounded lookups refresh recency, so they need the write lock
        let mut guard = self.write()?;
        let Entries { values, lru } = &mut *guard;
        let value = values.get(key).cloned();
        if value.is_some() {
            if let Some(lru) = lru.as_mut() {
                lru.touch(key);
            }
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut guard = self.write()?;
        let Entries { values, lru } = &mut *guard;

        if let (Some(max), Some(lru)) = (self.max_entries, lru.as_mut()) {
            // Overwrites never evict
            if !values.contains_key(key) && values.len() >= max {
                if let Some(evicted) = lru.evict_oldest() {
                    values.remove(&evicted);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %evicted, "evicted least recently used album");
                }
            }
            lru.touch(key);
        }

        values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut guard = self.write()?;
        if let Some(lru) = guard.lru.as_mut() {
            lru.remove(key);
        }
        Ok(guard.values.remove(key).is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.values.len())
    }

    /// Counts entries dropped by the LRU bound.
    fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

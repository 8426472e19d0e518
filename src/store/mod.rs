//! Backing Store Module
//!
//! The associative storage the album cache wraps. Stores hold serialized
//! album bytes by key; serialization belongs to the cache adapter.

mod lru;
mod memory;
mod sharded;

use std::sync::Arc;

use crate::error::Result;

pub(crate) use lru::LruTracker;
pub use memory::MemoryStore;
pub use sharded::ShardedStore;

// == Backing Store ==
/// Point lookup, upsert and deletion of serialized values by key.
///
/// Implementations must be safe to call from many threads at once. Failures
/// are reserved for an unavailable or corrupted store; an absent key is
/// `Ok(None)` from `get` and `Ok(false)` from `delete`.
pub trait BackingStore: Send + Sync {
    /// Returns the bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Inserts or overwrites the bytes stored under `key`.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Removes `key`, returning whether an entry was present.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Returns the number of stored entries.
    fn len(&self) -> Result<usize>;

    /// Returns how many entries the store dropped on its own.
    ///
    /// Unbounded stores never evict.
    fn evictions(&self) -> u64 {
        0
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn evictions(&self) -> u64 {
        (**self).evictions()
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn evictions(&self) -> u64 {
        (**self).evictions()
    }
}

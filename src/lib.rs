//! Album Cache - an in-process metadata cache for remote photo albums
//!
//! Spares the album-management layer from repeating remote lookups or
//! re-creating albums that already exist. Albums are keyed by title, stored
//! as JSON in a pluggable backing store, and removed only by explicit
//! invalidation or an opt-in LRU bound.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use cache::{AlbumCache, CacheStats, StoreBackedCache};
pub use config::{Backend, Config};
pub use error::{CacheError, Result, ResultExt};
pub use models::Album;
pub use store::{BackingStore, MemoryStore, ShardedStore};

//! Cache Module
//!
//! The album cache contract, its store-backed implementation, and
//! statistics.

mod album_cache;
mod codec;
mod stats;


// Re-export public types
pub use album_cache::{AlbumCache, StoreBackedCache};
pub use stats::CacheStats;

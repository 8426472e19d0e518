//! Album Cache Module
//!
//! The caching contract used by the album-management layer, and its
//! implementation over an injected backing store.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::cache::codec;
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::config::{Backend, Config};
use crate::error::{CacheError, Result};
use crate::models::Album;
use crate::store::{BackingStore, MemoryStore, ShardedStore};

// == Album Cache ==
/// Get, put and invalidate albums keyed by title.
///
/// A lookup for an absent title fails with [`CacheError::Miss`]; callers
/// treat that as the signal to go to the remote service and put the result.
/// Every other error means the cache itself is unavailable.
pub trait AlbumCache: Send + Sync {
    /// Returns the album cached under `title`.
    fn get_album(&self, title: &str) -> Result<Album>;

    /// Inserts or overwrites the entry for `album.title`.
    fn put_album(&self, album: &Album) -> Result<()>;

    /// Puts each album in order; a later duplicate title wins.
    ///
    /// Not transactional: on failure, albums already written stay written.
    fn put_many_albums(&self, albums: &[Album]) -> Result<()>;

    /// Removes the entry for `title`. Absent titles are not an error.
    fn invalidate_album(&self, title: &str) -> Result<()>;
}

impl<C: AlbumCache + ?Sized> AlbumCache for Arc<C> {
    fn get_album(&self, title: &str) -> Result<Album> {
        (**self).get_album(title)
    }

    fn put_album(&self, album: &Album) -> Result<()> {
        (**self).put_album(album)
    }

    fn put_many_albums(&self, albums: &[Album]) -> Result<()> {
        (**self).put_many_albums(albums)
    }

    fn invalidate_album(&self, title: &str) -> Result<()> {
        (**self).invalidate_album(title)
    }
}

impl<C: AlbumCache + ?Sized> AlbumCache for Box<C> {
    fn get_album(&self, title: &str) -> Result<Album> {
        (**self).get_album(title)
    }

    fn put_album(&self, album: &Album) -> Result<()> {
        (**self).put_album(album)
    }

    fn put_many_albums(&self, albums: &[Album]) -> Result<()> {
        (**self).put_many_albums(albums)
    }

    fn invalidate_album(&self, title: &str) -> Result<()> {
        (**self).invalidate_album(title)
    }
}

// == Store Backed Cache ==
/// [`AlbumCache`] over a [`BackingStore`], storing albums as JSON.
///
/// The cache owns its store; nothing else reaches into it.
#[derive(Debug, Default)]
pub struct StoreBackedCache<S> {
    store: S,
    stats: StatsRecorder,
}

impl<S: BackingStore> StoreBackedCache<S> {
    // == Constructor ==
    /// Creates a cache that takes exclusive ownership of `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            stats: StatsRecorder::default(),
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self
            .stats
            .snapshot(self.store.len()?, self.store.evictions()))
    }

    fn write(&self, album: &Album) -> Result<()> {
        let bytes = codec::encode(album)?;
        self.store.put(&album.title, bytes)?;
        self.stats.record_write();
        Ok(())
    }
}

impl StoreBackedCache<MemoryStore> {
    /// Creates an unbounded in-memory cache.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl StoreBackedCache<Box<dyn BackingStore>> {
    /// Builds a cache over the store selected by `config`.
    pub fn from_config(config: &Config) -> Self {
        let store: Box<dyn BackingStore> = match (config.backend, config.max_entries) {
            (Backend::Memory, Some(max)) => Box::new(MemoryStore::bounded(max)),
            (Backend::Memory, None) => Box::new(MemoryStore::new()),
            (Backend::Sharded, max) => {
                if let Some(max) = max {
                    warn!(max_entries = max, "sharded backend is unbounded, ignoring max_entries");
                }
                Box::new(ShardedStore::new())
            }
        };
        info!(
            backend = ?config.backend,
            max_entries = ?config.max_entries,
            "album cache initialized"
        );
        Self::new(store)
    }
}

impl<S: BackingStore> AlbumCache for StoreBackedCache<S> {
    fn get_album(&self, title: &str) -> Result<Album> {
        let bytes = self.store.get(title).inspect_err(|err| {
            warn!(title, error = %err, "album cache lookup failed");
        })?;

        match bytes {
            Some(bytes) => {
                let album = codec::decode(title, &bytes).inspect_err(|err| {
                    warn!(title, error = %err, "cached album is unreadable");
                })?;
                self.stats.record_hit();
                trace!(title, "album cache hit");
                Ok(album)
            }
            None => {
                self.stats.record_miss();
                trace!(title, "album cache miss");
                Err(CacheError::Miss(title.to_string()))
            }
        }
    }

    fn put_album(&self, album: &Album) -> Result<()> {
        self.write(album).inspect_err(|err| {
            warn!(title = %album.title, error = %err, "failed to cache album");
        })?;
        debug!(title = %album.title, "cached album");
        Ok(())
    }

    fn put_many_albums(&self, albums: &[Album]) -> Result<()> {
        for (written, album) in albums.iter().enumerate() {
            self.write(album).inspect_err(|err| {
                warn!(
                    title = %album.title,
                    written,
                    total = albums.len(),
                    error = %err,
                    "batch caching stopped partway"
                );
            })?;
        }
        debug!(count = albums.len(), "cached album batch");
        Ok(())
    }

    fn invalidate_album(&self, title: &str) -> Result<()> {
        let removed = self.store.delete(title).inspect_err(|err| {
            warn!(title, error = %err, "failed to invalidate album");
        })?;
        if removed {
            self.stats.record_invalidation();
            debug!(title, "invalidated album");
        }
        Ok(())
    }
}

//! Configuration Module
//!
//! Handles loading the album cache configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Which backing store the cache is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Single RwLock over a HashMap, optionally LRU-bounded
    #[default]
    Memory,
    /// DashMap, locked per shard, always unbounded
    Sharded,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "sharded" => Ok(Backend::Sharded),
            other => Err(format!("unknown album cache backend '{}'", other)),
        }
    }
}

/// Album cache configuration.
///
/// All values can be configured via environment variables with defaults
/// matching an unbounded in-memory cache.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backing store implementation
    pub backend: Backend,
    /// LRU bound for the memory backend, None = unbounded
    pub max_entries: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ALBUM_CACHE_BACKEND` - `memory` or `sharded` (default: memory)
    /// - `ALBUM_CACHE_MAX_ENTRIES` - LRU bound, 0 = unbounded (default: unbounded)
    pub fn from_env() -> Self {
        Self {
            backend: env::var("ALBUM_CACHE_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            max_entries: env::var("ALBUM_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n > 0),
        }
    }
}

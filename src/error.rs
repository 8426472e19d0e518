//! Error types for the album cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the album cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No entry exists for the requested title.
    ///
    /// This is ordinary control flow for callers: fetch from the remote
    /// service, then put the result.
    #[error("cache miss: {0}")]
    Miss(String),

    /// The backing store is unavailable or corrupted
    #[error("store failure: {0}")]
    Store(String),

    /// An album could not be serialized for storage
    #[error("failed to encode album '{title}': {source}")]
    Encode {
        title: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be deserialized back into an album
    #[error("failed to decode cached album '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Returns true if this is the distinguished cache-miss condition.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the album cache.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Result Extension ==
/// Converts lookups that may miss into an explicit optional value.
pub trait ResultExt<T> {
    /// Maps `Err(CacheError::Miss)` to `Ok(None)`, keeping every other error.
    fn found(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn found(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::Miss(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

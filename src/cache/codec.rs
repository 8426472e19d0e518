//! Album <-> stored bytes.

use crate::error::{CacheError, Result};
use crate::models::Album;

pub(crate) fn encode(album: &Album) -> Result<Vec<u8>> {
    serde_json::to_vec(album).map_err(|source| CacheError::Encode {
        title: album.title.clone(),
        source,
    })
}

pub(crate) fn decode(key: &str, bytes: &[u8]) -> Result<Album> {
    serde_json::from_slice(bytes).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

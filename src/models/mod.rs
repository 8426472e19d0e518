//! Data models for the album cache
//!
//! Defines the album entity cached on behalf of the album-management layer.

pub mod album;

pub use album::Album;

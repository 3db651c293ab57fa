//! In-memory artifact cache with dual eviction limits
//!
//! Stores generated byte blobs under opaque keys. The cache is bounded both by
//! the number of entries and by the total number of stored bytes, and evicts
//! the least-recently-used entry until both limits hold again.

mod cache;
mod types;

pub use cache::{ArtifactCache, DEFAULT_MAX_BYTES, DEFAULT_MAX_ITEMS};
pub use types::{ArtifactMetadata, CacheStats};

//! Drawing generation and retrieval
//!
//! [`DrawingService`] owns the artifact cache. Generation runs the pure
//! normalize, render and encode steps without holding the cache lock, then
//! stores the finished bytes in one locked step.

use crate::types::FileSummary;
use floorplan_geometry::{dxf, normalize, normalize_elements, render, Element, PlanError, RoomSpec};
use plan_artifact_cache::{ArtifactCache, ArtifactMetadata, CacheStats};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

pub const LABEL_ROOM_TYPE: &str = "room_type";
pub const LABEL_FILENAME: &str = "filename";
pub const LABEL_SHA256: &str = "sha256";

/// A freshly generated and cached drawing
#[derive(Debug, Clone)]
pub struct GeneratedDrawing {
    pub key: String,
    pub room: RoomSpec,
    pub element_count: usize,
    pub primitive_count: usize,
    pub size: usize,
}

pub struct DrawingService {
    cache: Mutex<ArtifactCache>,
}

impl DrawingService {
    pub fn new(cache: ArtifactCache) -> Self {
        Self {
            cache: Mutex::new(cache),
        }
    }

    /// Every cache operation restores the cache invariants before returning,
    /// so a poisoned lock still guards a consistent cache.
    fn cache(&self) -> MutexGuard<'_, ArtifactCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build a drawing from raw parameters, cache it and return its key.
    ///
    /// Malformed elements are skipped. Invalid dimensions or an encoding
    /// failure abort the call without caching anything.
    pub fn generate(&self, raw: &Value) -> Result<GeneratedDrawing, PlanError> {
        let room = normalize(raw)?;

        let elements: Vec<Element> = normalize_elements(raw)
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match element {
                Ok(element) => Some(element),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed element");
                    None
                }
            })
            .collect();

        let primitives = render(&room, &elements);
        let data = dxf::write_drawing(&primitives, room.unit)?;

        let key = new_key();
        let size = data.len();
        let metadata = ArtifactMetadata::new(size)
            .with_content_type(dxf::CONTENT_TYPE)
            .with_label(LABEL_ROOM_TYPE, room.room_type.as_str())
            .with_label(LABEL_FILENAME, key.as_str())
            .with_label(LABEL_SHA256, hex::encode(Sha256::digest(&data)));

        self.cache().set(key.clone(), data, Some(metadata));

        info!(
            key = %key,
            room_type = %room.room_type,
            length = room.length,
            width = room.width,
            elements = elements.len(),
            size,
            "Generated drawing"
        );

        Ok(GeneratedDrawing {
            key,
            room,
            element_count: elements.len(),
            primitive_count: primitives.len(),
            size,
        })
    }

    /// Drawing bytes; counts as a use of the drawing
    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.cache().get(key)
    }

    /// Bytes and metadata read under one lock
    pub fn get_artifact(&self, key: &str) -> Option<(Vec<u8>, ArtifactMetadata)> {
        let mut cache = self.cache();
        let data = cache.get(key)?;
        let metadata = cache.get_metadata(key)?;
        Some((data, metadata))
    }

    /// Metadata only; does not count as a use
    pub fn get_metadata(&self, key: &str) -> Option<ArtifactMetadata> {
        self.cache().get_metadata(key)
    }

    /// Cached drawings, most recently used first
    pub fn list_files(&self) -> Vec<FileSummary> {
        let cache = self.cache();
        cache
            .list_keys()
            .into_iter()
            .filter_map(|key| {
                let metadata = cache.get_metadata(&key)?;
                Some(FileSummary {
                    room_type: metadata.label(LABEL_ROOM_TYPE).map(str::to_string),
                    created_at: metadata.created_at,
                    size: metadata.size,
                    key,
                })
            })
            .collect()
    }

    pub fn delete_file(&self, key: &str) -> bool {
        self.cache().delete(key)
    }

    pub fn clear(&self) {
        self.cache().clear()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache().stats()
    }
}

impl Default for DrawingService {
    fn default() -> Self {
        Self::new(ArtifactCache::default())
    }
}

/// `drawing_<32 hex>.dxf`
fn new_key() -> String {
    format!("drawing_{}.dxf", Uuid::new_v4().simple())
}

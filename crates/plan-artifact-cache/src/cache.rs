//! LRU artifact store bounded by entry count and total bytes

use crate::types::{ArtifactMetadata, CacheStats};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default maximum number of cached artifacts
pub const DEFAULT_MAX_ITEMS: usize = 50;

/// Default cap on the total size of all cached artifacts (50 MiB)
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

struct Slot {
    data: Vec<u8>,
    metadata: ArtifactMetadata,
    /// Position in the recency order; larger is more recent
    tick: u64,
}

/// A key to bytes store with least-recently-used eviction.
///
/// Eviction runs after every insertion and removes the least-recently-used
/// entry while either the item limit or the byte limit is exceeded. The entry
/// that was just inserted is never evicted by its own insertion: a single
/// artifact larger than `max_bytes` is retained until the next insertion makes
/// it the least-recently-used entry.
///
/// The cache itself is not synchronized. Owners that share it between threads
/// must hold one lock across each call.
pub struct ArtifactCache {
    entries: HashMap<String, Slot>,
    /// tick -> key, oldest first
    recency: BTreeMap<u64, String>,
    next_tick: u64,
    max_items: usize,
    max_bytes: usize,
    /// Exact sum of `data.len()` over live entries
    total_bytes: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ArtifactCache {
    /// Create a new cache with the given limits
    pub fn new(max_items: usize, max_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            next_tick: 0,
            max_items,
            max_bytes,
            total_bytes: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Store `data` under `key`, replacing any previous entry for that key.
    ///
    /// When `metadata` is `None`, metadata with the current time and the data
    /// length is recorded. A supplied `size` is overwritten with the real
    /// length of `data`.
    pub fn set(&mut self, key: impl Into<String>, data: Vec<u8>, metadata: Option<ArtifactMetadata>) {
        let key = key.into();

        if let Some(old) = self.remove_slot(&key) {
            debug!(key = %key, old_size = old.data.len(), "Replacing cached artifact");
        }

        let size = data.len();
        let mut metadata = metadata.unwrap_or_else(|| ArtifactMetadata::new(size));
        metadata.size = size;

        let tick = self.bump_tick();
        self.recency.insert(tick, key.clone());
        self.entries.insert(
            key.clone(),
            Slot {
                data,
                metadata,
                tick,
            },
        );
        self.total_bytes += size;
        debug!(key = %key, size, total_bytes = self.total_bytes, "Cached artifact");

        self.evict_if_needed();
    }

    /// Get an artifact, marking it as most recently used
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        if !self.entries.contains_key(key) {
            self.misses += 1;
            debug!(key = %key, "Cache miss");
            return None;
        }

        let tick = self.bump_tick();
        let slot = self.entries.get_mut(key)?;
        self.recency.remove(&slot.tick);
        slot.tick = tick;
        self.recency.insert(tick, key.to_string());

        self.hits += 1;
        debug!(key = %key, "Cache hit");
        Some(slot.data.clone())
    }

    /// Get the metadata of an artifact without touching its recency
    pub fn get_metadata(&self, key: &str) -> Option<ArtifactMetadata> {
        self.entries.get(key).map(|slot| slot.metadata.clone())
    }

    /// All keys, most recently used first
    pub fn list_keys(&self) -> Vec<String> {
        self.recency.values().rev().cloned().collect()
    }

    /// Remove an artifact. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_slot(key).is_some();
        if removed {
            debug!(key = %key, total_bytes = self.total_bytes, "Deleted cached artifact");
        }
        removed
    }

    /// Remove every artifact and reset byte accounting
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.total_bytes = 0;
        debug!("Cache cleared");
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Get current cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            total_bytes: self.total_bytes,
            max_items: self.max_items,
            max_bytes: self.max_bytes,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }

    fn bump_tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn over_limits(&self) -> bool {
        self.entries.len() > self.max_items || self.total_bytes > self.max_bytes
    }

    /// Evict least-recently-used entries until both limits hold.
    /// The most recent entry always survives.
    fn evict_if_needed(&mut self) {
        while self.over_limits() && self.entries.len() > 1 {
            let Some((_, key)) = self.recency.pop_first() else {
                break;
            };

            if let Some(slot) = self.entries.remove(&key) {
                self.total_bytes -= slot.data.len();
                self.evictions += 1;
                debug!(
                    key = %key,
                    size = slot.data.len(),
                    total_bytes = self.total_bytes,
                    "Evicted least recently used artifact"
                );
            }
        }
    }

    fn remove_slot(&mut self, key: &str) -> Option<Slot> {
        let slot = self.entries.remove(key)?;
        self.recency.remove(&slot.tick);
        self.total_bytes -= slot.data.len();
        Some(slot)
    }
}

impl Default for ArtifactCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS, DEFAULT_MAX_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sum_of_sizes(cache: &ArtifactCache) -> usize {
        cache
            .list_keys()
            .iter()
            .map(|key| cache.get_metadata(key).unwrap().size)
            .sum()
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = ArtifactCache::new(10, 1024);
        cache.set("a", b"Hello, world!".to_vec(), None);

        assert_eq!(cache.get("a"), Some(b"Hello, world!".to_vec()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_bytes(), 13);
    }

    #[test]
    fn test_cache_miss() {
        let mut cache = ArtifactCache::default();
        assert!(cache.get("nonexistent").is_none());
        assert!(cache.get_metadata("nonexistent").is_none());
        assert!(!cache.delete("nonexistent"));
    }

    #[test]
    fn test_default_metadata() {
        let mut cache = ArtifactCache::default();
        cache.set("a", vec![0; 9], None);

        let metadata = cache.get_metadata("a").unwrap();
        assert_eq!(metadata.size, 9);
        assert!(metadata.content_type.is_none());
    }

    #[test]
    fn test_supplied_metadata_size_is_corrected() {
        let mut cache = ArtifactCache::default();
        let metadata = ArtifactMetadata::new(999).with_label("room_type", "office");
        cache.set("a", vec![0; 4], Some(metadata));

        let stored = cache.get_metadata("a").unwrap();
        assert_eq!(stored.size, 4);
        assert_eq!(stored.label("room_type"), Some("office"));
    }

    #[test]
    fn test_replace_adjusts_byte_accounting() {
        let mut cache = ArtifactCache::new(10, 1024);
        cache.set("a", vec![0; 100], None);
        cache.set("b", vec![0; 10], None);
        cache.set("a", vec![1; 30], None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.total_bytes(), 40);
        assert_eq!(cache.get("a"), Some(vec![1; 30]));
        // Replacement counts as the most recent use
        assert_eq!(cache.list_keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_keys_most_recent_first() {
        let mut cache = ArtifactCache::new(10, 1024);
        cache.set("a", vec![0], None);
        cache.set("b", vec![0], None);
        cache.set("c", vec![0], None);
        assert_eq!(cache.list_keys(), vec!["c", "b", "a"]);

        cache.get("a");
        assert_eq!(cache.list_keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_item_limit_evicts_least_recently_used() {
        let mut cache = ArtifactCache::new(2, 1024);
        cache.set("a", vec![0], None);
        cache.set("b", vec![0], None);
        cache.set("c", vec![0], None);

        assert!(!cache.contains_key("a"));
        assert!(cache.contains_key("b"));
        assert!(cache.contains_key("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_get_promotes_before_eviction() {
        let mut cache = ArtifactCache::new(2, 1024);
        cache.set("a", vec![0], None);
        cache.set("b", vec![0], None);
        assert!(cache.get("a").is_some());
        cache.set("c", vec![0], None);

        assert!(cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("c"));
    }

    #[test]
    fn test_get_metadata_does_not_promote() {
        let mut cache = ArtifactCache::new(2, 1024);
        cache.set("a", vec![0], None);
        cache.set("b", vec![0], None);
        for _ in 0..3 {
            assert!(cache.get_metadata("a").is_some());
        }
        assert_eq!(cache.list_keys(), vec!["b", "a"]);

        cache.set("c", vec![0], None);
        assert!(!cache.contains_key("a"));
        assert!(cache.contains_key("b"));
    }

    #[test]
    fn test_byte_limit_may_evict_several() {
        let mut cache = ArtifactCache::new(10, 20);
        cache.set("a", vec![0; 8], None);
        cache.set("b", vec![0; 8], None);
        cache.set("c", vec![0; 18], None);

        assert_eq!(cache.list_keys(), vec!["c"]);
        assert_eq!(cache.total_bytes(), 18);
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_oversized_entry_retained_until_next_insert() {
        let mut cache = ArtifactCache::new(10, 20);
        cache.set("a", vec![0; 5], None);
        cache.set("big", vec![0; 50], None);

        // Only the oversized entry is left, above the byte limit
        assert_eq!(cache.list_keys(), vec!["big"]);
        assert_eq!(cache.total_bytes(), 50);
        assert!(cache.get("big").is_some());

        cache.set("small", vec![0; 5], None);
        assert_eq!(cache.list_keys(), vec!["small"]);
        assert_eq!(cache.total_bytes(), 5);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut cache = ArtifactCache::new(10, 1024);
        cache.set("a", vec![0; 3], None);
        cache.set("b", vec![0; 4], None);

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert_eq!(cache.total_bytes(), 4);
        assert_eq!(cache.list_keys(), vec!["b"]);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes(), 0);
        assert!(cache.list_keys().is_empty());

        // Still usable after a clear
        cache.set("c", vec![0; 2], None);
        assert_eq!(cache.total_bytes(), 2);
    }

    #[test]
    fn test_hit_miss_counters() {
        let mut cache = ArtifactCache::default();
        cache.get("a");
        cache.set("a", vec![0], None);
        cache.get("a");
        cache.get_metadata("a");

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.max_items, DEFAULT_MAX_ITEMS);
        assert_eq!(stats.max_bytes, DEFAULT_MAX_BYTES);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(u8, usize),
        Get(u8),
        Delete(u8),
        Clear,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0u8..8, 0usize..64).prop_map(|(k, size)| Op::Set(k, size)),
            3 => (0u8..8).prop_map(Op::Get),
            2 => (0u8..8).prop_map(Op::Delete),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_limits_hold_after_every_set(
            max_items in 1usize..6,
            max_bytes in 1usize..128,
            ops in prop::collection::vec(arb_op(), 1..80),
        ) {
            let mut cache = ArtifactCache::new(max_items, max_bytes);
            for op in ops {
                match op {
                    Op::Set(k, size) => {
                        cache.set(format!("k{}", k), vec![0; size], None);
                        prop_assert!(cache.len() <= max_items);
                        if size <= max_bytes {
                            prop_assert!(cache.total_bytes() <= max_bytes);
                        } else {
                            prop_assert_eq!(cache.len(), 1);
                        }
                    }
                    Op::Get(k) => {
                        cache.get(&format!("k{}", k));
                    }
                    Op::Delete(k) => {
                        cache.delete(&format!("k{}", k));
                    }
                    Op::Clear => cache.clear(),
                }
            }
        }

        #[test]
        fn prop_byte_accounting_never_drifts(
            max_items in 1usize..6,
            max_bytes in 1usize..128,
            ops in prop::collection::vec(arb_op(), 1..80),
        ) {
            let mut cache = ArtifactCache::new(max_items, max_bytes);
            for op in ops {
                match op {
                    Op::Set(k, size) => cache.set(format!("k{}", k), vec![0; size], None),
                    Op::Get(k) => {
                        cache.get(&format!("k{}", k));
                    }
                    Op::Delete(k) => {
                        cache.delete(&format!("k{}", k));
                    }
                    Op::Clear => cache.clear(),
                }
                prop_assert_eq!(cache.total_bytes(), sum_of_sizes(&cache));
                prop_assert_eq!(cache.list_keys().len(), cache.len());
            }
        }

        #[test]
        fn prop_metadata_reads_keep_order(
            keys in prop::collection::vec(0u8..8, 1..20),
            probe in 0u8..8,
        ) {
            let mut cache = ArtifactCache::new(16, 1024);
            for k in keys {
                cache.set(format!("k{}", k), vec![0; 4], None);
            }
            let before = cache.list_keys();
            cache.get_metadata(&format!("k{}", probe));
            cache.get_metadata(&format!("k{}", probe));
            prop_assert_eq!(before, cache.list_keys());
        }
    }
}

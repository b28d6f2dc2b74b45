use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use catalog::KeyValueStore;
use foundation::{Clock, DAY_MS, LatLng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CacheError;

/// Entries older than this are treated as absent.
pub const DEFAULT_STALE_AFTER_MS: u64 = 30 * DAY_MS;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedCoords {
    pub coords: LatLng,
    /// Milliseconds since the Unix epoch when the lookup succeeded.
    pub timestamp: u64,
}

/// Place name → coordinate cache with a staleness window.
///
/// Entries are never deleted; stale ones are ignored and overwritten by the
/// next successful lookup. Keys live in a `BTreeMap` so the persisted JSON is
/// stable across writes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCache {
    stale_after_ms: u64,
    entries: BTreeMap<String, CachedCoords>,
}

impl Default for GeocodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER_MS)
    }
}

impl GeocodeCache {
    pub fn new(stale_after_ms: u64) -> Self {
        Self {
            stale_after_ms,
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, place: &str) -> Option<&CachedCoords> {
        self.entries.get(place)
    }

    /// Coordinate for `place` if present and younger than the staleness window.
    pub fn get_fresh(&self, place: &str, now_ms: u64) -> Option<LatLng> {
        let e = self.entries.get(place)?;
        (now_ms.saturating_sub(e.timestamp) < self.stale_after_ms).then_some(e.coords)
    }

    pub fn insert(&mut self, place: impl Into<String>, coords: LatLng, now_ms: u64) {
        self.entries.insert(
            place.into(),
            CachedCoords {
                coords,
                timestamp: now_ms,
            },
        );
    }

    /// Decodes the persisted `{ place: { coords, timestamp } }` object.
    ///
    /// Entries that do not decode (or carry out-of-range coordinates) are
    /// dropped individually.
    pub fn from_json(raw: &str, stale_after_ms: u64) -> Result<Self, CacheError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| CacheError::Encode(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(CacheError::Encode("expected a JSON object".to_string()));
        };

        let mut cache = Self::new(stale_after_ms);
        for (place, entry) in map {
            match serde_json::from_value::<CachedCoords>(entry) {
                Ok(e) if e.coords.is_valid() => {
                    cache.entries.insert(place, e);
                }
                _ => debug!(%place, "dropping unreadable cache entry"),
            }
        }
        Ok(cache)
    }

    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string(&self.entries).map_err(|e| CacheError::Encode(e.to_string()))
    }

    /// Reads the cache from `store`; anything unreadable starts an empty cache.
    pub fn load(store: &dyn KeyValueStore, key: &str, stale_after_ms: u64) -> Self {
        let raw = match store.get(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Self::new(stale_after_ms),
            Err(e) => {
                warn!("failed to load geocode cache: {e}");
                return Self::new(stale_after_ms);
            }
        };
        Self::from_json(&raw, stale_after_ms).unwrap_or_else(|e| {
            warn!("failed to load geocode cache: {e}");
            Self::new(stale_after_ms)
        })
    }

    /// Overwrites the whole slot with the current cache.
    pub fn persist(&self, store: &dyn KeyValueStore, key: &str) -> Result<(), CacheError> {
        store.set(key, &self.to_json()?)?;
        Ok(())
    }
}

/// Session-scoped cache shared between the resolver and the queue worker.
///
/// The in-memory cache is authoritative for the session; storage writes are
/// best-effort. The lock is never held across an `.await`.
pub struct SharedCache {
    cache: Mutex<GeocodeCache>,
    store: Arc<dyn KeyValueStore + Send + Sync>,
    storage_key: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SharedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("storage_key", &self.storage_key)
            .field("entries", &self.len())
            .finish()
    }
}

impl SharedCache {
    pub fn new(
        cache: GeocodeCache,
        store: Arc<dyn KeyValueStore + Send + Sync>,
        storage_key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache: Mutex::new(cache),
            store,
            storage_key: storage_key.into(),
            clock,
        }
    }

    /// Loads the persisted cache from `store` and wraps it.
    pub fn open(
        store: Arc<dyn KeyValueStore + Send + Sync>,
        storage_key: impl Into<String>,
        stale_after_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cache = GeocodeCache::load(store.as_ref(), &storage_key, stale_after_ms);
        debug!(entries = cache.len(), "geocode cache loaded");
        Self::new(cache, store, storage_key, clock)
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn len(&self) -> usize {
        self.with_cache(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fresh(&self, place: &str) -> Option<LatLng> {
        let now = self.now_ms();
        self.with_cache(|c| c.get_fresh(place, now)).flatten()
    }

    /// Stores a successful lookup and persists the whole cache.
    pub fn record(&self, place: &str, coords: LatLng) {
        let now = self.now_ms();
        let snapshot = self.with_cache(|c| {
            c.insert(place, coords, now);
            c.to_json()
        });
        let Some(snapshot) = snapshot else {
            return;
        };
        let result = snapshot.and_then(|raw| {
            self.store
                .set(&self.storage_key, &raw)
                .map_err(CacheError::from)
        });
        if let Err(e) = result {
            warn!("failed to save geocode cache: {e}");
        }
    }

    pub fn snapshot(&self) -> GeocodeCache {
        self.with_cache(|c| c.clone()).unwrap_or_default()
    }

    fn with_cache<R>(&self, f: impl FnOnce(&mut GeocodeCache) -> R) -> Option<R> {
        match self.cache.lock() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(_) => {
                warn!("geocode cache lock poisoned");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_STALE_AFTER_MS, GeocodeCache, SharedCache};
    use catalog::{InMemoryStore, KeyValueStore, StorageError};
    use foundation::{DAY_MS, LatLng, ManualClock};
    use std::sync::Arc;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn entries_expire_after_window() {
        let mut cache = GeocodeCache::default();
        cache.insert("old", LatLng::new(1.0, 2.0), NOW - 31 * DAY_MS);
        cache.insert("recent", LatLng::new(3.0, 4.0), NOW - DAY_MS);

        assert_eq!(cache.get_fresh("old", NOW), None);
        assert_eq!(cache.get_fresh("recent", NOW), Some(LatLng::new(3.0, 4.0)));
        assert_eq!(cache.get_fresh("missing", NOW), None);
        // Stale entries stay until overwritten.
        assert!(cache.entry("old").is_some());
    }

    #[test]
    fn reads_browser_cache_format() {
        let raw = r#"{
            "Chengdu": {"coords": [30.66, 104.06], "timestamp": 1699999999000},
            "Broken": {"coords": "nope", "timestamp": 1},
            "Nowhere": {"coords": [123.0, 0.0], "timestamp": 1}
        }"#;
        let cache = GeocodeCache::from_json(raw, DEFAULT_STALE_AFTER_MS).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_fresh("Chengdu", NOW), Some(LatLng::new(30.66, 104.06)));
    }

    #[test]
    fn malformed_storage_loads_empty() {
        let store = InMemoryStore::new();
        store.set("k", "[1, 2]").unwrap();
        assert!(GeocodeCache::load(&store, "k", DEFAULT_STALE_AFTER_MS).is_empty());
        assert!(GeocodeCache::load(&store, "absent", DEFAULT_STALE_AFTER_MS).is_empty());
    }

    #[test]
    fn persist_then_load_keeps_entries() {
        let store = InMemoryStore::new();
        let mut cache = GeocodeCache::default();
        cache.insert("Lhasa", LatLng::new(29.65, 91.1), NOW);
        cache.persist(&store, "k").unwrap();

        let loaded = GeocodeCache::load(&store, "k", DEFAULT_STALE_AFTER_MS);
        assert_eq!(loaded, cache);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<bool, StorageError> {
            Ok(false)
        }
    }

    #[test]
    fn record_survives_storage_failure() {
        let clock = ManualClock::new(NOW);
        let shared = SharedCache::open(
            Arc::new(ReadOnlyStore),
            "k",
            DEFAULT_STALE_AFTER_MS,
            Arc::new(clock),
        );
        shared.record("Xi'an", LatLng::new(34.34, 108.94));
        assert_eq!(shared.fresh("Xi'an"), Some(LatLng::new(34.34, 108.94)));
    }

    #[test]
    fn record_persists_whole_cache() {
        let store = Arc::new(InMemoryStore::new());
        let clock = ManualClock::new(NOW);
        let shared = SharedCache::open(store.clone(), "k", DEFAULT_STALE_AFTER_MS, Arc::new(clock));
        shared.record("a", LatLng::new(1.0, 1.0));
        shared.record("b", LatLng::new(2.0, 2.0));

        let raw = store.get("k").unwrap().unwrap();
        let reloaded = GeocodeCache::from_json(&raw, DEFAULT_STALE_AFTER_MS).unwrap();
        assert_eq!(reloaded.len(), 2);
    }
}

use std::sync::Arc;

use catalog::KeyValueStore;
use foundation::{Clock, LatLng, parse_coordinates, place_name};
use tracing::debug;

use crate::cache::SharedCache;
use crate::config::GeocodeConfig;
use crate::provider::{Geocoder, NominatimGeocoder};
use crate::queue::GeocodeQueue;

/// Location text → coordinate.
///
/// Embedded coordinates win, then the cache, then the serial geocoding queue.
/// Failures of any kind surface as `None`.
#[derive(Debug)]
pub struct Resolver {
    cache: Arc<SharedCache>,
    queue: GeocodeQueue,
}

impl Resolver {
    /// Must be called inside a tokio runtime; the queue worker is spawned here.
    pub fn new(cache: Arc<SharedCache>, geocoder: Arc<dyn Geocoder>, config: &GeocodeConfig) -> Self {
        let config = config.clone().normalized();
        let queue = GeocodeQueue::spawn(
            cache.clone(),
            geocoder,
            config.request_delay,
            config.queue_capacity,
        );
        Self { cache, queue }
    }

    /// Resolver backed by the public search service and a persisted cache.
    pub fn nominatim(
        client: reqwest::Client,
        store: Arc<dyn KeyValueStore + Send + Sync>,
        clock: Arc<dyn Clock>,
        config: &GeocodeConfig,
    ) -> Self {
        let cache = Arc::new(SharedCache::open(
            store,
            config.storage_key.clone(),
            config.stale_after_ms,
            clock,
        ));
        let geocoder = Arc::new(NominatimGeocoder::new(client, config));
        Self::new(cache, geocoder, config)
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Network-free resolution: embedded coordinates or a fresh cache entry.
    pub fn cached(&self, text: &str) -> Option<LatLng> {
        if let Some(coords) = parse_coordinates(text) {
            return Some(coords);
        }
        let place = place_name(text)?;
        self.cache.fresh(&place)
    }

    pub async fn resolve(&self, text: &str) -> Option<LatLng> {
        if let Some(coords) = parse_coordinates(text) {
            return Some(coords);
        }
        let place = place_name(text)?;
        if let Some(coords) = self.cache.fresh(&place) {
            debug!(%place, "geocode cache hit");
            return Some(coords);
        }
        self.queue.submit(place).await
    }

    pub async fn shutdown(self) {
        self.queue.shutdown().await;
    }
}

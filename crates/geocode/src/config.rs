use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_STALE_AFTER_MS;

/// Public geocoding endpoint (one GET per place name, JSON array response).
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "FolioGallery/1.0";
pub const DEFAULT_STORAGE_KEY: &str = "folio_geocode_cache";

/// Lower bound on the spacing between requests to the geocoding service.
pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeConfig {
    pub endpoint: String,
    /// Sent as `User-Agent`; the public service requires an identifying client.
    pub user_agent: String,
    /// Waited before each dispatch and again after it. Never below
    /// [`MIN_REQUEST_DELAY`].
    pub request_delay: Duration,
    pub stale_after_ms: u64,
    pub storage_key: String,
    /// Capacity of the request channel; callers wait when it is full.
    pub queue_capacity: usize,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay: MIN_REQUEST_DELAY,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            queue_capacity: 256,
        }
    }
}

impl GeocodeConfig {
    /// Defaults overridden by `FOLIO_GEOCODE_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            endpoint: env::var("FOLIO_GEOCODE_ENDPOINT").unwrap_or(d.endpoint),
            user_agent: env::var("FOLIO_GEOCODE_USER_AGENT").unwrap_or(d.user_agent),
            request_delay: Duration::from_millis(env_var_u64(
                "FOLIO_GEOCODE_DELAY_MS",
                d.request_delay.as_millis() as u64,
            )),
            stale_after_ms: env_var_u64("FOLIO_GEOCODE_STALE_AFTER_MS", d.stale_after_ms),
            storage_key: env::var("FOLIO_GEOCODE_CACHE_KEY").unwrap_or(d.storage_key),
            queue_capacity: env_var_u64("FOLIO_GEOCODE_QUEUE_CAPACITY", d.queue_capacity as u64)
                as usize,
        }
        .normalized()
    }

    /// Clamps values that would violate the service's rate limit or stall the queue.
    pub fn normalized(mut self) -> Self {
        self.request_delay = self.request_delay.max(MIN_REQUEST_DELAY);
        self.queue_capacity = self.queue_capacity.max(1);
        self
    }
}

fn env_var_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

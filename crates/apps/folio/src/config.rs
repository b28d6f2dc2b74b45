use std::env;
use std::path::PathBuf;

use geocode::GeocodeConfig;

/// Runtime settings, read from `FOLIO_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub gallery_data: String,
    pub stories_data: String,
    /// Directory holding the persisted geocode cache.
    pub cache_dir: PathBuf,
    pub container_width: f64,
    pub geocode: GeocodeConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            gallery_data: env::var("FOLIO_GALLERY_DATA")
                .unwrap_or_else(|_| "./data/gallery.json".to_string()),
            stories_data: env::var("FOLIO_STORIES_DATA")
                .unwrap_or_else(|_| "./data/stories.json".to_string()),
            cache_dir: PathBuf::from(
                env::var("FOLIO_CACHE_DIR").unwrap_or_else(|_| ".folio-cache".to_string()),
            ),
            container_width: env_var_f64("FOLIO_CONTAINER_WIDTH", 1264.0),
            geocode: GeocodeConfig::from_env(),
        }
    }
}

fn env_var_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

//! Geocoding service boundary.

use std::future::Future;
use std::pin::Pin;

use foundation::LatLng;
use serde::Deserialize;
use serde_json::Value;

use crate::config::GeocodeConfig;
use crate::error::GeocodeError;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves a place name to a coordinate.
///
/// Returns `Ok(None)` when the service has no match, `Err` on transport or
/// decoding failures. Methods return boxed futures for dyn-compatibility.
pub trait Geocoder: Send + Sync {
    fn lookup<'a>(&'a self, place: &'a str) -> BoxFuture<'a, Result<Option<LatLng>, GeocodeError>>;
}

/// Nominatim-style search API (`?format=json&q=...&limit=1`).
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    user_agent: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, config: &GeocodeConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup<'a>(&'a self, place: &'a str) -> BoxFuture<'a, Result<Option<LatLng>, GeocodeError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.endpoint)
                .query(&[("format", "json"), ("q", place), ("limit", "1")])
                .header(reqwest::header::USER_AGENT, &self.user_agent)
                .send()
                .await
                .map_err(|e| GeocodeError::Http(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(GeocodeError::Status(resp.status().as_u16()));
            }

            let body = resp
                .text()
                .await
                .map_err(|e| GeocodeError::Http(e.to_string()))?;
            parse_search_response(&body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: Value,
    lon: Value,
}

/// Reads the first hit of a search response. Only `lat`/`lon` are used; the
/// service sends them as strings.
pub fn parse_search_response(body: &str) -> Result<Option<LatLng>, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;
    let Some(first) = hits.first() else {
        return Ok(None);
    };
    let lat = number(&first.lat).ok_or_else(|| GeocodeError::Malformed("lat".to_string()))?;
    let lng = number(&first.lon).ok_or_else(|| GeocodeError::Malformed("lon".to_string()))?;
    LatLng::checked(lat, lng)
        .map(Some)
        .ok_or_else(|| GeocodeError::Malformed(format!("out of range: {lat}, {lng}")))
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

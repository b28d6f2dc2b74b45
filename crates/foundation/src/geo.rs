use serde::{Deserialize, Serialize};

/// Mean Earth radius (kilometres) used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinate in decimal degrees.
///
/// Serializes as a `[lat, lng]` pair, which is the shape stored in the
/// geocode cache.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `None` unless both components are finite and in range.
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let ll = Self::new(lat, lng);
        ll.is_valid().then_some(ll)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Key used to merge nearby photos into one map marker (4 decimals, ~11 m).
    pub fn group_key(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(v: LatLng) -> Self {
        [v.lat, v.lng]
    }
}

/// Haversine distance between two coordinates, in kilometres.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::{EARTH_RADIUS_KM, LatLng, haversine_km};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(LatLng::checked(91.0, 0.0).is_none());
        assert!(LatLng::checked(0.0, -180.5).is_none());
        assert!(LatLng::checked(f64::NAN, 0.0).is_none());
        assert!(LatLng::checked(-90.0, 180.0).is_some());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = LatLng::new(31.23, 121.47);
        assert_close(haversine_km(p, p), 0.0, 1e-9);
    }

    #[test]
    fn quarter_meridian_distance() {
        let d = haversine_km(LatLng::new(0.0, 0.0), LatLng::new(90.0, 0.0));
        assert_close(d, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, 1e-6);
    }

    #[test]
    fn group_key_rounds_to_four_decimals() {
        assert_eq!(LatLng::new(33.076318, 101.148402).group_key(), "33.0763,101.1484");
    }

    #[test]
    fn serializes_as_pair() {
        let json = serde_json::to_string(&LatLng::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LatLng::new(1.5, -2.0));
    }
}

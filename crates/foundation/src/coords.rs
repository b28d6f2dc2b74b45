//! Coordinate extraction from free-text photo locations.
//!
//! Locations in the catalog look like `"Shanghai"`, `"31.23, 121.47"` or
//! `"Siguniang N31° 4' 34.7\" E102° 53' 54.2\""`. Degree-minute-second
//! pairs take precedence over bare decimals so that the numbers inside a DMS
//! triple are never mistaken for a decimal pair.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::geo::LatLng;

static DMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"N([\d.]+)°\s*([\d.]+)'\s*([\d.]+)"\s*E([\d.]+)°\s*([\d.]+)'\s*([\d.]+)""#)
        .expect("valid DMS pattern")
});

static DECIMAL_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?[\d.]+)[,\s]+(-?[\d.]+)").expect("valid decimal pattern"));

static DMS_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"N[\d.]+°[\s\d.'"]+E[\d.]+°[\s\d.'"]+"#).expect("valid DMS span pattern")
});

/// Extracts a coordinate from `text`, or `None` if nothing usable is found.
pub fn parse_coordinates(text: &str) -> Option<LatLng> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = DMS.captures(text) {
        let lat = dms_to_degrees(&caps, 1)?;
        let lng = dms_to_degrees(&caps, 4)?;
        return LatLng::checked(lat, lng);
    }

    let caps = DECIMAL_PAIR.captures(text)?;
    let lat = leading_float(caps.get(1)?.as_str())?;
    let lng = leading_float(caps.get(2)?.as_str())?;
    LatLng::checked(lat, lng)
}

/// Removes embedded DMS coordinates and returns the remaining place name.
pub fn place_name(text: &str) -> Option<String> {
    let stripped = DMS_SPAN.replace_all(text, "");
    let name = stripped.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn dms_to_degrees(caps: &Captures<'_>, first: usize) -> Option<f64> {
    let d = leading_float(caps.get(first)?.as_str())?;
    let m = leading_float(caps.get(first + 1)?.as_str())?;
    let s = leading_float(caps.get(first + 2)?.as_str())?;
    Some(d + m / 60.0 + s / 3600.0)
}

/// Parses the longest numeric prefix, so `"1.2.3"` reads as `1.2`.
fn leading_float(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{leading_float, parse_coordinates, place_name};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn parses_dms_pair() {
        let ll = parse_coordinates("N33° 4' 34.747\" E101° 8' 54.247\"").unwrap();
        assert_close(ll.lat, 33.076_318, 1e-5);
        assert_close(ll.lng, 101.148_402, 1e-5);
    }

    #[test]
    fn dms_wins_over_other_numbers() {
        let ll = parse_coordinates("12, 34 Aba N33° 4' 34.747\" E101° 8' 54.247\"").unwrap();
        assert_close(ll.lat, 33.076_318, 1e-5);
        assert_close(ll.lng, 101.148_402, 1e-5);
    }

    #[test]
    fn parses_decimal_pair() {
        let ll = parse_coordinates("31.2304, 121.4737").unwrap();
        assert_close(ll.lat, 31.2304, 1e-12);
        assert_close(ll.lng, 121.4737, 1e-12);

        let ll = parse_coordinates("-33.86 151.21").unwrap();
        assert_close(ll.lat, -33.86, 1e-12);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(parse_coordinates("200, 50").is_none());
        assert!(parse_coordinates("50, 200").is_none());
    }

    #[test]
    fn plain_names_do_not_match() {
        assert!(parse_coordinates("Chengdu, Sichuan").is_none());
        assert!(parse_coordinates("").is_none());
        assert!(parse_coordinates("Route 66").is_none());
    }

    #[test]
    fn place_name_strips_dms() {
        assert_eq!(
            place_name("Siguniang N31° 4' 34.7\" E102° 53' 54.2\"").as_deref(),
            Some("Siguniang")
        );
        assert_eq!(place_name("N31° 4' 34.7\" E102° 53' 54.2\""), None);
        assert_eq!(place_name("  Hangzhou "), Some("Hangzhou".to_string()));
    }

    #[test]
    fn leading_float_mimics_prefix_parsing() {
        assert_eq!(leading_float("1.2.3"), Some(1.2));
        assert_eq!(leading_float("7."), Some(7.0));
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("-4"), Some(-4.0));
    }
}

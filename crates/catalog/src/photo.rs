use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// One entry of `gallery.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoItem {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub src: String,
    #[serde(default, deserialize_with = "de_text")]
    pub alt: String,
    #[serde(default, deserialize_with = "de_text")]
    pub caption: String,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<Exif>,
}

/// Camera metadata. Every field is independently optional.
///
/// Source JSON is produced by several tools, so numeric fields (`iso`,
/// sometimes `focal`) may arrive as numbers or strings; both are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exif {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub focal: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub shutter: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl PhotoItem {
    pub fn new(category: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn camera(&self) -> Option<&str> {
        self.exif.as_ref()?.camera.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl Exif {
    /// Focal length, aperture, shutter and ISO in display order.
    pub fn tech_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        for v in [&self.focal, &self.aperture, &self.shutter].into_iter().flatten() {
            if !v.is_empty() {
                parts.push(v.clone());
            }
        }
        if let Some(iso) = &self.iso {
            parts.push(format!("ISO {iso}"));
        }
        parts
    }
}

/// Distinct categories in first-seen order (drives the filter chips).
pub fn categories(items: &[PhotoItem]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !item.category.is_empty() && !out.iter().any(|c| c == &item.category) {
            out.push(item.category.clone());
        }
    }
    out
}

static WIDTH_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&])w=\d+").expect("valid width pattern"));

/// Drops every `w=<n>` width hint so the full-resolution image is requested.
pub fn original_url(src: &str) -> String {
    let Some((base, query)) = src.split_once('?') else {
        return src.to_string();
    };
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_width_hint(pair))
        .collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

fn is_width_hint(pair: &str) -> bool {
    pair.strip_prefix("w=")
        .is_some_and(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
}

/// Rewrites the first width hint to `width`; sources without one are unchanged.
pub fn with_width(src: &str, width: u32) -> String {
    WIDTH_PARAM
        .replace(src, |caps: &regex::Captures<'_>| format!("{}w={width}", &caps[1]))
        .into_owned()
}

/// Last path segment without query or fragment.
pub fn file_name(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.rsplit('/').next().unwrap_or(path)
}

fn de_text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_text(d)?.unwrap_or_default())
}

fn de_opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

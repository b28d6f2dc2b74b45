//! Loading `gallery.json` / `stories.json`.
//!
//! A missing or malformed source is "no data", never a fatal error: the
//! `load_*` entry points log and return an empty list. Individual entries
//! that fail to decode are skipped so one bad record does not blank the page.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::CatalogError;
use crate::photo::PhotoItem;
use crate::story::Story;

/// Where a JSON document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http(s)://` strings are URLs, anything else is a filesystem path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Url(u) => write!(f, "{u}"),
        }
    }
}

pub async fn fetch_text(http: &reqwest::Client, source: &Source) -> Result<String, CatalogError> {
    match source {
        Source::Path(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound
            } else {
                CatalogError::Io(format!("read {}: {e}", path.display()))
            }
        }),
        Source::Url(url) => {
            let resp = http
                .get(url)
                .send()
                .await
                .map_err(|e| CatalogError::Fetch(e.to_string()))?;
            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound);
            }
            if !resp.status().is_success() {
                return Err(CatalogError::Fetch(format!("{url}: HTTP {}", resp.status())));
            }
            resp.text()
                .await
                .map_err(|e| CatalogError::Fetch(e.to_string()))
        }
    }
}

/// Decodes a JSON array, skipping entries that do not match `T`.
pub fn parse_array<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, CatalogError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(CatalogError::Corrupt("expected a JSON array".to_string()));
    };

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry) {
            Ok(v) => out.push(v),
            Err(e) => warn!(index = i, "skipping malformed entry: {e}"),
        }
    }
    Ok(out)
}

pub fn parse_catalog(json: &str) -> Result<Vec<PhotoItem>, CatalogError> {
    parse_array(json)
}

pub fn parse_stories(json: &str) -> Result<Vec<Story>, CatalogError> {
    parse_array(json)
}

pub async fn try_load_catalog(
    http: &reqwest::Client,
    source: &Source,
) -> Result<Vec<PhotoItem>, CatalogError> {
    parse_catalog(&fetch_text(http, source).await?)
}

pub async fn try_load_stories(
    http: &reqwest::Client,
    source: &Source,
) -> Result<Vec<Story>, CatalogError> {
    parse_stories(&fetch_text(http, source).await?)
}

/// Loads the photo catalog; failures yield an empty catalog.
pub async fn load_catalog(http: &reqwest::Client, source: &Source) -> Vec<PhotoItem> {
    try_load_catalog(http, source).await.unwrap_or_else(|e| {
        warn!(%source, "gallery data unavailable: {e}");
        Vec::new()
    })
}

/// Loads the stories feed; failures yield an empty feed.
pub async fn load_stories(http: &reqwest::Client, source: &Source) -> Vec<Story> {
    try_load_stories(http, source).await.unwrap_or_else(|e| {
        warn!(%source, "stories data unavailable: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::{Source, load_catalog, parse_catalog, parse_stories};
    use crate::error::CatalogError;
    use std::path::PathBuf;

    #[test]
    fn non_array_is_corrupt() {
        let err = parse_catalog(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Corrupt(_)));
        assert!(matches!(parse_catalog("not json"), Err(CatalogError::Corrupt(_))));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let items =
            parse_catalog(r#"[{"category":"city","src":"a.jpg"}, 17, {"category":"nature","src":"b.jpg"}]"#)
                .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].src, "b.jpg");
    }

    #[test]
    fn stories_parse() {
        let stories = parse_stories(r#"[{"title":"a","text":"hi"}]"#).unwrap();
        assert_eq!(stories[0].text.as_deref(), Some("hi"));
    }

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            Source::parse("https://x.test/gallery.json"),
            Source::Url("https://x.test/gallery.json".into())
        );
        assert_eq!(
            Source::parse("./data/gallery.json"),
            Source::Path(PathBuf::from("./data/gallery.json"))
        );
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let http = reqwest::Client::new();
        let items = load_catalog(&http, &Source::Path("/definitely/not/here.json".into())).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn loads_catalog_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(&path, r#"[{"category":"city","src":"a.jpg","caption":"Bund"}]"#).unwrap();
        let items = load_catalog(&reqwest::Client::new(), &Source::Path(path)).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].caption, "Bund");
    }
}

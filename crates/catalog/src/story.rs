use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One entry of `stories.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Story {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// `date`, falling back to `time`.
    pub fn when(&self) -> Option<&str> {
        self.date.as_deref().or(self.time.as_deref())
    }

    /// Publication date as `YYYY-MM-DD`, empty when missing or unparseable.
    pub fn ymd(&self) -> String {
        self.when().map(format_date_ymd).unwrap_or_default()
    }
}

static SLUG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\x{4e00}-\x{9fa5}]+").expect("valid slug pattern"));

/// Stable identifier used in `story.html?id=` links.
///
/// Explicit ids win. Otherwise the id is a slug of the title plus the date.
/// `index` (position in the feed) is only used when both are empty.
pub fn story_id(story: &Story, index: usize) -> String {
    if let Some(id) = story.id.as_deref().filter(|s| !s.is_empty()) {
        return id.to_string();
    }
    let lowered = story.title().to_lowercase();
    let slug = SLUG_SEPARATORS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    let date = story.ymd();
    match (slug.is_empty(), date.is_empty()) {
        (_, false) => format!("{slug}-{date}"),
        (false, true) => slug.to_string(),
        (true, true) => format!("story-{index}"),
    }
}

/// Normalizes the date formats found in story files to `YYYY-MM-DD`.
pub fn format_date_ymd(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    String::new()
}

/// A story with its neighbors in feed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoryPosition<'a> {
    pub index: usize,
    pub story: &'a Story,
    pub prev: Option<&'a Story>,
    pub next: Option<&'a Story>,
}

pub fn find_story<'a>(stories: &'a [Story], id: &str) -> Option<StoryPosition<'a>> {
    let index = stories
        .iter()
        .enumerate()
        .position(|(i, s)| story_id(s, i) == id)?;
    Some(StoryPosition {
        index,
        story: &stories[index],
        prev: index.checked_sub(1).map(|i| &stories[i]),
        next: stories.get(index + 1),
    })
}

fn de_opt_id<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

use catalog::{PhotoItem, file_name};

/// Query parameters understood by the gallery pages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageParams {
    /// `scan=1`: opt into directory scanning.
    pub scan: bool,
    /// File name to highlight.
    pub highlight: Option<String>,
    /// Full image URL to highlight; tried before `highlight`.
    pub image_url: Option<String>,
    /// Story id on the detail page.
    pub id: Option<String>,
}

impl PageParams {
    /// Parses `location.search`, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut out = Self::default();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            let v = v.into_owned();
            match k.as_ref() {
                "scan" => out.scan = v == "1",
                "highlight" if !v.is_empty() => out.highlight = Some(v),
                "imageUrl" if !v.is_empty() => out.image_url = Some(v),
                "id" if !v.is_empty() => out.id = Some(v),
                _ => {}
            }
        }
        out
    }

    pub fn wants_highlight(&self) -> bool {
        self.highlight.is_some() || self.image_url.is_some()
    }
}

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Index of the card a deep link points at.
///
/// The full URL is matched first (ignoring query strings), then the file name
/// against card file names and alt text.
pub fn find_highlight_target(cards: &[PhotoItem], params: &PageParams) -> Option<usize> {
    if let Some(target) = params.image_url.as_deref() {
        let target = strip_query(target);
        let target_file = file_name(target);
        let hit = cards.iter().position(|c| {
            let card_url = strip_query(&c.src);
            card_url == target || (!target_file.is_empty() && card_url.contains(target_file))
        });
        if hit.is_some() {
            return hit;
        }
    }

    let wanted = params.highlight.as_deref().filter(|s| !s.is_empty())?;
    cards.iter().position(|c| {
        let name = file_name(&c.src);
        (!name.is_empty() && (name.contains(wanted) || wanted.contains(name)))
            || c.alt.contains(wanted)
    })
}

//! The small Markdown dialect used in story bodies.
//!
//! Supported: images, `**bold**`, `*italic*`, `` `code` ``, http(s) links and
//! blank-line separated paragraphs. Everything else is escaped text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::template::escape_html;

static IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^\s)]+)(?:\s+"([^"]+)")?\)"#).expect("valid image pattern")
});
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^*])\*([^*\n]+?)\*([^*]|$)").expect("valid italic pattern")
});
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code pattern"));
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(.+?)\]\((https?:[^\s)]+)\)").expect("valid link pattern")
});
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid paragraph pattern"));
static SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("valid slot pattern"));

// Private-use delimiters; they survive escaping and inline formatting untouched.
const SLOT_OPEN: char = '\u{E000}';

pub fn render_markdown(text: &str) -> String {
    let text = text.replace("\r\n", "\n");

    // Images are pulled out first so their URLs are not escaped or formatted.
    let mut figures = Vec::new();
    let text = IMAGE.replace_all(&text, |caps: &Captures<'_>| {
        let title = caps
            .get(3)
            .map(|t| format!(r#" title="{}""#, escape_html(t.as_str())))
            .unwrap_or_default();
        figures.push(format!(
            r#"<figure class="story-image"><img src="{}" alt="{}"{title} loading="lazy" /></figure>"#,
            escape_html(&caps[2]),
            escape_html(&caps[1]),
        ));
        format!("\u{E000}{}\u{E001}", figures.len() - 1)
    });

    let html = escape_html(&text);
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "$1<em>$2</em>$3");
    let html = CODE.replace_all(&html, "<code>$1</code>");
    let html = LINK.replace_all(&html, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#);

    let mut out = String::new();
    for part in PARAGRAPH_BREAK.split(&html) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.starts_with(SLOT_OPEN) {
            out.push_str(part);
        } else {
            out.push_str("<p>");
            out.push_str(part);
            out.push_str("</p>");
        }
    }

    let out = SLOT.replace_all(&out, |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| figures.get(i).cloned())
            .unwrap_or_default()
    });
    if out.is_empty() {
        "<p></p>".to_string()
    } else {
        out.into_owned()
    }
}

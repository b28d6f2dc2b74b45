//! HTML fragments for cards, stories and brand logos.
//!
//! Every interpolated value goes through [`escape_html`].

use catalog::{PhotoItem, Story, find_story, story_id};
use masonry::Placement;

use crate::markdown::render_markdown;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Query-string encoding for link parameters.
pub fn encode_component(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Location, camera, lens and exposure tags shown on cards and in the lightbox.
pub fn info_tags(item: &PhotoItem) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(loc) = item.location() {
        tags.push(tag("📍", loc));
    }
    if let Some(exif) = &item.exif {
        if let Some(camera) = exif.camera.as_deref().filter(|s| !s.is_empty()) {
            tags.push(tag("📷", camera));
        }
        if let Some(lens) = exif.lens.as_deref().filter(|s| !s.is_empty()) {
            tags.push(tag("🔭", lens));
        }
        let tech = exif.tech_parts();
        if !tech.is_empty() {
            tags.push(tag("⚙️", &tech.join(" · ")));
        }
    }
    tags
}

fn tag(icon: &str, text: &str) -> String {
    format!(r#"<span class="tag">{icon} {}</span>"#, escape_html(text))
}

fn data_attrs(item: &PhotoItem) -> String {
    let exif = item.exif.as_ref();
    let pairs: [(&str, Option<&str>); 8] = [
        ("category", Some(item.category.as_str())),
        ("location", item.location.as_deref()),
        ("camera", exif.and_then(|e| e.camera.as_deref())),
        ("lens", exif.and_then(|e| e.lens.as_deref())),
        ("focal", exif.and_then(|e| e.focal.as_deref())),
        ("aperture", exif.and_then(|e| e.aperture.as_deref())),
        ("shutter", exif.and_then(|e| e.shutter.as_deref())),
        ("iso", exif.and_then(|e| e.iso.as_deref())),
    ];
    pairs
        .into_iter()
        .filter_map(|(k, v)| {
            let v = v.filter(|v| !v.is_empty())?;
            Some(format!(r#"data-{k}="{}""#, escape_html(v)))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn card(item: &PhotoItem, style: Option<String>) -> String {
    let attrs = data_attrs(item);
    let style = style
        .map(|s| format!(r#" style="{s}""#))
        .unwrap_or_default();
    let tags = info_tags(item);
    let meta = if tags.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="meta">{}</div>"#, tags.concat())
    };
    format!(
        r#"<figure class="card" {attrs}{style}><img loading="lazy" src="{}" alt="{}" /><figcaption>{}</figcaption>{meta}</figure>"#,
        escape_html(&item.src),
        escape_html(&item.alt),
        escape_html(&item.caption),
    )
}

pub fn render_card(item: &PhotoItem) -> String {
    card(item, None)
}

/// Card absolutely positioned at a masonry placement.
pub fn render_card_positioned(item: &PhotoItem, p: &Placement) -> String {
    card(
        item,
        Some(format!(
            "position:absolute;left:{}px;top:{}px;width:{}px",
            p.left, p.top, p.width
        )),
    )
}

pub fn render_placeholder() -> String {
    r#"<div class="gallery-empty">No items in this category.</div>"#.to_string()
}

/// Brand key for a camera model string, if recognised.
pub fn camera_brand(camera: &str) -> Option<&'static str> {
    let name = camera.trim().to_lowercase();
    let has = |s: &str| name.contains(s);
    let brand = if has("l2d-20c") || has("l3d-100c") || has("dji") {
        "dji"
    } else if has("nikon") {
        "nikon"
    } else if has("canon") {
        "canon"
    } else if has("sony") {
        "sony"
    } else if has("fujifilm") || has("fuji") {
        "fujifilm"
    } else if has("hasselblad") {
        "hasselblad"
    } else if has("leica") {
        "leica"
    } else if has("panasonic") || has("lumix") {
        "panasonic"
    } else if has("olympus") || has("om-") {
        "olympus"
    } else if has("pentax") {
        "pentax"
    } else {
        return None;
    };
    Some(brand)
}

pub fn brand_logo(camera: &str) -> Option<String> {
    camera_brand(camera).map(|b| format!("./assets/brands/{b}.svg"))
}

/// `<img>` for the brand logo, or an empty string.
pub fn render_brand_logo(camera: &str) -> String {
    let Some(path) = brand_logo(camera) else {
        return String::new();
    };
    let label = camera.split(' ').next().unwrap_or(camera);
    format!(
        r#"<img src="{}" alt="{}" class="camera-brand-logo" />"#,
        escape_html(&path),
        escape_html(label)
    )
}

fn story_href(story: &Story, index: usize) -> String {
    format!("./story.html?id={}", encode_component(&story_id(story, index)))
}

/// Collapsed feed entry: title and date, linking to the detail page.
pub fn render_story_card(story: &Story, index: usize) -> String {
    let date = story.ymd();
    let meta = if date.is_empty() {
        String::new()
    } else {
        format!("<span>{}</span>", escape_html(&date))
    };
    format!(
        r#"<article class="story-card"><a class="card-link" href="{}"><div class="head"><div class="avatar">◎</div><h3 class="title">{}</h3><div class="meta">{meta}</div></div></a></article>"#,
        escape_html(&story_href(story, index)),
        escape_html(story.title()),
    )
}

pub fn render_story_feed(stories: &[Story]) -> String {
    stories
        .iter()
        .enumerate()
        .map(|(i, s)| render_story_card(s, i))
        .collect()
}

/// Full story page for `id`, or a "not found" message.
pub fn render_story_detail(stories: &[Story], id: &str) -> String {
    let Some(pos) = find_story(stories, id) else {
        return r#"<p class="muted">Story not found.</p><p><a class="btn" href="./stories.html">Back to stories</a></p>"#
            .to_string();
    };
    let story = pos.story;

    let date = story.ymd();
    let location = story
        .location
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!(" · 📍 {}", escape_html(l)))
        .unwrap_or_default();
    let header = format!(
        r#"<h1>{}</h1><div class="meta">{}{location}</div>"#,
        escape_html(story.title()),
        escape_html(&date)
    );

    let media = story
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|src| format!(r#"<div class="media"><img src="{}" alt="" /></div>"#, escape_html(src)))
        .unwrap_or_default();

    let body = story
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#"<div class="body">{}</div>"#, render_markdown(t)))
        .unwrap_or_default();

    let prev = match pos.prev {
        Some(p) => format!(
            r#"<a href="{}">← Previous: {}</a>"#,
            escape_html(&story_href(p, pos.index - 1)),
            escape_html(p.title())
        ),
        None => "<span></span>".to_string(),
    };
    let next = match pos.next {
        Some(n) => format!(
            r#"<a href="{}">Next: {} →</a>"#,
            escape_html(&story_href(n, pos.index + 1)),
            escape_html(n.title())
        ),
        None => "<span></span>".to_string(),
    };

    format!(
        r#"{header}{media}{body}<div class="story-nav">{prev}{next}</div><p><a class="btn" href="./stories.html">Back to stories</a></p>"#
    )
}

#[cfg(test)]
mod tests {
    use super::{
        brand_logo, camera_brand, escape_html, render_card, render_card_positioned,
        render_story_card, render_story_detail,
    };
    use catalog::{Exif, PhotoItem, Story};
    use masonry::Placement;

    fn item() -> PhotoItem {
        PhotoItem {
            category: "city".into(),
            src: "./works/bund.jpg?w=600".into(),
            alt: "Bund \"night\"".into(),
            caption: "<b>Shanghai</b>".into(),
            location: Some("Shanghai".into()),
            exif: Some(Exif {
                camera: Some("NIKON Z 6".into()),
                focal: Some("35mm".into()),
                aperture: Some("f/1.8".into()),
                iso: Some("400".into()),
                ..Exif::default()
            }),
        }
    }

    #[test]
    fn escapes_the_four_specials() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape_html("it's"), "it's");
    }

    #[test]
    fn card_carries_data_and_tags() {
        let html = render_card(&item());
        assert!(html.starts_with(r#"<figure class="card" data-category="city" data-location="Shanghai" data-camera="NIKON Z 6""#));
        assert!(html.contains(r#"data-iso="400""#));
        assert!(!html.contains("data-lens"));
        assert!(html.contains(r#"alt="Bund &quot;night&quot;""#));
        assert!(html.contains("<figcaption>&lt;b&gt;Shanghai&lt;/b&gt;</figcaption>"));
        assert!(html.contains(r#"<span class="tag">⚙️ 35mm · f/1.8 · ISO 400</span>"#));
    }

    #[test]
    fn bare_card_has_no_meta() {
        let html = render_card(&PhotoItem::new("nature", "a.jpg"));
        assert!(!html.contains("class=\"meta\""));
    }

    #[test]
    fn positioned_card_has_absolute_style() {
        let p = Placement {
            column: 1,
            left: 316.0,
            top: 48.5,
            width: 300.0,
            height: 200.0,
        };
        let html = render_card_positioned(&item(), &p);
        assert!(html.contains(r#"style="position:absolute;left:316px;top:48.5px;width:300px""#));
    }

    #[test]
    fn brands() {
        assert_eq!(camera_brand("DJI Mavic 3"), Some("dji"));
        assert_eq!(camera_brand("L2D-20c"), Some("dji"));
        assert_eq!(camera_brand("FUJIFILM X-T5"), Some("fujifilm"));
        assert_eq!(camera_brand("OM-1"), Some("olympus"));
        assert_eq!(camera_brand("iPhone 15 Pro"), None);
        assert_eq!(brand_logo("Canon EOS R5").as_deref(), Some("./assets/brands/canon.svg"));
    }

    fn stories() -> Vec<Story> {
        vec![
            Story {
                title: Some("First Light".into()),
                date: Some("2024-03-01".into()),
                text: Some("Hello **world**".into()),
                location: Some("Lhasa".into()),
                ..Story::default()
            },
            Story {
                title: Some("Second".into()),
                id: Some("two".into()),
                ..Story::default()
            },
        ]
    }

    #[test]
    fn story_card_links_to_detail() {
        let html = render_story_card(&stories()[0], 0);
        assert!(html.contains(r#"href="./story.html?id=first-light-2024-03-01""#));
        assert!(html.contains("<span>2024-03-01</span>"));
    }

    #[test]
    fn story_detail_renders_body_and_nav() {
        let html = render_story_detail(&stories(), "first-light-2024-03-01");
        assert!(html.contains("<h1>First Light</h1>"));
        assert!(html.contains("2024-03-01 · 📍 Lhasa"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert!(html.contains(r#"<span></span><a href="./story.html?id=two">Next: Second →</a>"#));

        let missing = render_story_detail(&stories(), "nope");
        assert!(missing.contains("Story not found."));
    }
}

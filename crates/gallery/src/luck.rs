//! "Try your luck": one random photo at full resolution.

use catalog::{Exif, PhotoItem, original_url};
use foundation::place_name;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::template::{escape_html, render_brand_logo};

#[derive(Debug, Clone, PartialEq)]
pub struct LuckPick<'a> {
    pub item: &'a PhotoItem,
    pub original_url: String,
    /// Place name without embedded coordinates.
    pub location: Option<String>,
}

/// Uniformly random item; `None` for an empty catalog.
pub fn pick<'a, R: Rng + ?Sized>(items: &'a [PhotoItem], rng: &mut R) -> Option<LuckPick<'a>> {
    let item = items.choose(rng)?;
    Some(LuckPick {
        item,
        original_url: original_url(&item.src),
        location: item.location().and_then(place_name),
    })
}

/// ISO, aperture (always `f/`-prefixed), shutter and focal length.
pub fn exposure_parts(exif: &Exif) -> Vec<String> {
    let mut parts = Vec::new();
    let field = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    if let Some(iso) = field(&exif.iso) {
        parts.push(format!("ISO {iso}"));
    }
    if let Some(ap) = field(&exif.aperture) {
        parts.push(if ap.starts_with("f/") { ap } else { format!("f/{ap}") });
    }
    parts.extend(field(&exif.shutter));
    parts.extend(field(&exif.focal));
    parts
}

pub fn render_luck_info(pick: &LuckPick<'_>) -> String {
    let item = pick.item;
    let title = [&item.alt, &item.caption]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .map(String::as_str)
        .unwrap_or("Untitled");
    let mut html = format!(
        r#"<div class="luck-info-title"><h3>{}</h3></div>"#,
        escape_html(title)
    );

    if let Some(loc) = &pick.location {
        html.push_str(&format!(
            r#"<div class="luck-info-location"><strong>Location:</strong> {}</div>"#,
            escape_html(loc)
        ));
    }

    let exif = item.exif.clone().unwrap_or_default();
    let camera = exif.camera.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let lens = exif.lens.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if camera.is_some() || lens.is_some() {
        html.push_str(r#"<div class="luck-info-camera">"#);
        if let Some(camera) = camera {
            html.push_str(&format!(
                "<div><strong>Camera:</strong> {}{}</div>",
                render_brand_logo(camera),
                escape_html(camera)
            ));
        }
        if let Some(lens) = lens {
            html.push_str(&format!("<div><strong>Lens:</strong> {}</div>", escape_html(lens)));
        }
        html.push_str("</div>");
    }

    let exposure = exposure_parts(&exif);
    if !exposure.is_empty() {
        let joined = exposure.iter().map(|p| escape_html(p)).collect::<Vec<_>>().join(" | ");
        html.push_str(&format!(
            r#"<div class="luck-info-exif"><strong>Exposure:</strong> {joined}</div>"#
        ));
    }

    if pick.location.is_some() {
        html.push_str(r#"<div class="luck-map-container"><div id="luckMap" class="luck-map"></div></div>"#);
    }
    html
}

#[cfg(test)]
mod tests {
    use super::{exposure_parts, pick, render_luck_info};
    use catalog::{Exif, PhotoItem};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_catalog_has_no_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick(&[], &mut rng).is_none());
    }

    #[test]
    fn pick_strips_width_hint() {
        let items = vec![PhotoItem::new("city", "./a.jpg?w=600")
            .with_location("Hong Kong N22° 16' 42.0\" E114° 10' 9.0\"")];
        let mut rng = StdRng::seed_from_u64(7);
        let p = pick(&items, &mut rng).unwrap();
        assert_eq!(p.original_url, "./a.jpg");
        assert_eq!(p.location.as_deref(), Some("Hong Kong"));
    }

    #[test]
    fn every_item_is_reachable() {
        let items: Vec<_> = (0..5).map(|i| PhotoItem::new("c", format!("{i}.jpg"))).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let p = pick(&items, &mut rng).unwrap();
            let i: usize = p.item.src.trim_end_matches(".jpg").parse().unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn exposure_normalises_aperture() {
        let exif = Exif {
            iso: Some("100".into()),
            aperture: Some("2.8".into()),
            shutter: Some("1/250".into()),
            focal: Some(" 50mm ".into()),
            ..Exif::default()
        };
        assert_eq!(exposure_parts(&exif), vec!["ISO 100", "f/2.8", "1/250", "50mm"]);
    }

    #[test]
    fn info_lists_camera_with_logo() {
        let mut item = PhotoItem::new("nature", "x.jpg");
        item.caption = "Glacier".into();
        item.exif = Some(Exif {
            camera: Some("SONY ILCE-7M4".into()),
            ..Exif::default()
        });
        let p = super::LuckPick {
            item: &item,
            original_url: "x.jpg".into(),
            location: None,
        };
        let html = render_luck_info(&p);
        assert!(html.contains("<h3>Glacier</h3>"));
        assert!(html.contains(r#"src="./assets/brands/sony.svg" alt="SONY""#));
        assert!(!html.contains("luckMap"));
    }
}

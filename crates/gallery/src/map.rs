//! Photos grouped by location for the map screen.
//!
//! The first pass uses only embedded coordinates and the geocode cache, so
//! markers appear without waiting on the network. Items that miss go through
//! the resolver afterwards, one at a time in catalog order.

use std::collections::BTreeMap;

use catalog::PhotoItem;
use foundation::{GeoBounds, LatLng, haversine_km, parse_coordinates, place_name};
use geocode::Resolver;
use tracing::debug;

use crate::template::{encode_component, escape_html};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapConfig {
    /// Initial view before any marker is known.
    pub center: LatLng,
    pub zoom: u8,
    /// Thumbnails shown in a marker popup.
    pub popup_photos: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(35.0, 105.0),
            zoom: 4,
            popup_photos: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup {
    /// Coordinate rounded to four decimals, `"lat,lng"`.
    pub key: String,
    pub coords: LatLng,
    pub label: String,
    pub items: Vec<PhotoItem>,
}

/// Groups in the order their first item was placed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapGroups {
    groups: Vec<LocationGroup>,
    by_key: BTreeMap<String, usize>,
}

impl MapGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[LocationGroup] {
        &self.groups
    }

    pub fn get(&self, key: &str) -> Option<&LocationGroup> {
        self.by_key.get(key).map(|&i| &self.groups[i])
    }

    /// Adds `item` at `coords`; returns the index of its group.
    pub fn add(&mut self, coords: LatLng, item: &PhotoItem) -> usize {
        let key = coords.group_key();
        let idx = match self.by_key.get(&key) {
            Some(&i) => i,
            None => {
                let location = item.location.as_deref().unwrap_or_default();
                self.groups.push(LocationGroup {
                    key: key.clone(),
                    coords,
                    label: group_label(location),
                    items: Vec::new(),
                });
                self.by_key.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].items.push(item.clone());
        idx
    }

    /// Viewport covering every group centre.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.groups.iter().map(|g| g.coords))
    }
}

/// Place name without embedded coordinates, or the raw location if that
/// leaves nothing.
pub fn group_label(location: &str) -> String {
    place_name(location).unwrap_or_else(|| location.trim().to_string())
}

/// Network-free first pass. Returns the groups and the items still needing
/// a lookup; items without a location are skipped.
pub fn group_cached<'a>(items: &'a [PhotoItem], resolver: &Resolver) -> (MapGroups, Vec<&'a PhotoItem>) {
    let mut groups = MapGroups::new();
    let mut pending = Vec::new();
    for item in items {
        let Some(location) = item.location() else {
            continue;
        };
        match resolver.cached(location) {
            Some(coords) => {
                groups.add(coords, item);
            }
            None => pending.push(item),
        }
    }
    debug!(groups = groups.len(), pending = pending.len(), "map first pass");
    (groups, pending)
}

/// Resolves `pending` in order, calling `on_group` with each group that
/// gained an item. Returns how many items were placed.
pub async fn resolve_pending(
    groups: &mut MapGroups,
    pending: &[&PhotoItem],
    resolver: &Resolver,
    mut on_group: impl FnMut(&LocationGroup),
) -> usize {
    let mut placed = 0;
    for item in pending {
        let Some(location) = item.location() else {
            continue;
        };
        let Some(coords) = resolver.resolve(location).await else {
            continue;
        };
        let idx = groups.add(coords, item);
        on_group(&groups.groups[idx]);
        placed += 1;
    }
    placed
}

/// Group items ordered by distance from the group centre. Items whose own
/// location carries no coordinate count as distance zero.
pub fn popup_items(group: &LocationGroup) -> Vec<(&PhotoItem, f64)> {
    let mut out: Vec<(&PhotoItem, f64)> = group
        .items
        .iter()
        .map(|it| {
            let d = it
                .location
                .as_deref()
                .and_then(parse_coordinates)
                .map(|c| haversine_km(group.coords, c))
                .unwrap_or(0.0);
            (it, d)
        })
        .collect();
    out.sort_by(|a, b| a.1.total_cmp(&b.1));
    out
}

pub fn render_popup(group: &LocationGroup, max_photos: usize) -> String {
    let sorted = popup_items(group);
    let total = sorted.len();
    let photos: String = sorted
        .iter()
        .take(max_photos)
        .enumerate()
        .map(|(i, (item, _))| {
            let overflow = if total > max_photos && i + 1 == max_photos {
                format!(r#"<div class="map-popup-photo-count">+{}</div>"#, total - max_photos)
            } else {
                String::new()
            };
            format!(
                r#"<div class="map-popup-photo" data-index="{i}" data-src="{src}" data-href="{href}"><img src="{src}" alt="{alt}" loading="lazy" />{overflow}</div>"#,
                src = escape_html(&item.src),
                href = escape_html(&gallery_link(&item.src)),
                alt = escape_html(&item.alt),
            )
        })
        .collect();
    let noun = if total == 1 { "photo" } else { "photos" };
    format!(
        r#"<div class="map-popup-content"><div class="map-popup-title">📍 {}</div><div class="map-popup-count">{total} {noun}</div><div class="map-popup-photos">{photos}</div></div>"#,
        escape_html(&group.label)
    )
}

/// Gallery deep link that highlights `src` and opens it in the lightbox.
pub fn gallery_link(src: &str) -> String {
    format!(
        "./gallery.html?highlight={}&imageUrl={}",
        encode_component(catalog::file_name(src)),
        encode_component(src)
    )
}

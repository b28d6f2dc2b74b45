//! Incremental data loader.
//!
//! Owns the full catalog and decides how much of the active filter's matches
//! is rendered. Pagination exists only for the unfiltered view: a category
//! filter renders every match at once.

use std::ops::Range;

use catalog::PhotoItem;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    /// `"all"` (or nothing) is the unfiltered view; anything else a category.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Filter::All
        } else {
            Filter::Category(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Category(c) => c,
        }
    }

    pub fn matches(&self, item: &PhotoItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(c) => &item.category == c,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoaderConfig {
    pub initial_batch: usize,
    pub batch_size: usize,
    /// Load more once the viewport bottom is this close to the document end.
    pub scroll_threshold_px: f64,
    pub scroll_debounce_ms: u64,
    pub resize_debounce_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            initial_batch: 30,
            batch_size: 20,
            scroll_threshold_px: 200.0,
            scroll_debounce_ms: 100,
            resize_debounce_ms: 250,
        }
    }
}

/// What the host must do with the gallery container after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Replace the container with the first `count` visible items.
    Render { generation: u64, count: usize },
    /// A category with no items: show the "no items" element.
    Placeholder { generation: u64 },
}

/// Items appended by one scroll-triggered load, as indices into the visible list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub generation: u64,
    pub range: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct RenderWindow {
    config: LoaderConfig,
    items: Vec<PhotoItem>,
    loaded: bool,
    filter: Filter,
    /// Indices into `items` that pass `filter`, in catalog order.
    matching: Vec<usize>,
    rendered: usize,
    loading: bool,
    armed: bool,
    /// Bumped on load and on every filter change; stale batches compare unequal.
    generation: u64,
}

impl RenderWindow {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            loaded: false,
            filter: Filter::All,
            matching: Vec::new(),
            rendered: 0,
            loading: false,
            armed: false,
            generation: 0,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn matching_len(&self) -> usize {
        self.matching.len()
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether scroll events may trigger further loads.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// The rendered prefix of the matching items.
    pub fn visible(&self) -> impl Iterator<Item = &PhotoItem> + '_ {
        self.matching[..self.rendered].iter().map(|&i| &self.items[i])
    }

    /// Items of the rendered prefix in `range` (clamped).
    pub fn visible_range(&self, range: Range<usize>) -> Vec<&PhotoItem> {
        let end = range.end.min(self.rendered);
        let start = range.start.min(end);
        self.matching[start..end]
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    /// Installs the catalog and shows the first page of the unfiltered view.
    pub fn load(&mut self, items: Vec<PhotoItem>) -> Update {
        self.items = items;
        self.loaded = true;
        debug!(items = self.items.len(), "catalog loaded");
        self.set_filter(Filter::All)
    }

    pub fn set_filter(&mut self, filter: Filter) -> Update {
        self.filter = filter;
        self.matching = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, it)| self.filter.matches(it))
            .map(|(i, _)| i)
            .collect();
        self.generation = self.generation.wrapping_add(1);
        // A batch still in flight belongs to the previous generation.
        self.loading = false;

        let total = self.matching.len();
        match self.filter {
            Filter::All => {
                self.rendered = self.config.initial_batch.min(total);
                self.armed = self.rendered < total;
            }
            Filter::Category(_) => {
                self.rendered = total;
                self.armed = false;
            }
        }
        debug!(
            filter = self.filter.as_str(),
            matching = total,
            rendered = self.rendered,
            "filter applied"
        );

        if total == 0 && matches!(self.filter, Filter::Category(_)) {
            Update::Placeholder {
                generation: self.generation,
            }
        } else {
            Update::Render {
                generation: self.generation,
                count: self.rendered,
            }
        }
    }

    /// Reveals the next batch if the unfiltered view has more to show and no
    /// batch is in flight.
    pub fn maybe_load_more(&mut self) -> Option<Batch> {
        let total = self.matching.len();
        if self.filter != Filter::All || !self.armed || self.loading || self.rendered >= total {
            return None;
        }
        let start = self.rendered;
        let end = start.saturating_add(self.config.batch_size).min(total);
        if end == start {
            return None;
        }
        self.rendered = end;
        self.loading = true;
        if self.rendered >= total {
            self.armed = false;
        }
        debug!(start, end, total, "loading batch");
        Some(Batch {
            generation: self.generation,
            range: start..end,
        })
    }

    /// Marks `batch` appended. Batches from an earlier generation are ignored.
    pub fn finish_batch(&mut self, batch: &Batch) -> bool {
        if batch.generation != self.generation {
            debug!(batch = batch.generation, current = self.generation, "stale batch");
            return false;
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Batch, Filter, LoaderConfig, RenderWindow, Update};
    use catalog::PhotoItem;

    fn catalog(n: usize) -> Vec<PhotoItem> {
        (0..n)
            .map(|i| {
                let cat = if i % 3 == 0 { "city" } else { "nature" };
                PhotoItem::new(cat, format!("./img/{i}.jpg?w=600"))
            })
            .collect()
    }

    #[test]
    fn small_catalog_renders_everything_unarmed() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        assert!(!w.is_loaded());
        let update = w.load(catalog(25));
        assert_eq!(update, Update::Render { generation: 1, count: 25 });
        assert!(!w.is_armed());
        assert_eq!(w.maybe_load_more(), None);
    }

    #[test]
    fn large_catalog_pages_by_batch() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(100));
        assert_eq!(w.rendered(), 30);
        assert!(w.is_armed());

        let batch = w.maybe_load_more().unwrap();
        assert_eq!(batch.range, 30..50);
        // In flight: further triggers are ignored.
        assert_eq!(w.maybe_load_more(), None);
        assert!(w.finish_batch(&batch));

        let mut last = batch;
        while let Some(b) = w.maybe_load_more() {
            w.finish_batch(&b);
            last = b;
        }
        assert_eq!(last.range, 90..100);
        assert_eq!(w.rendered(), 100);
        assert!(!w.is_armed());
    }

    #[test]
    fn short_final_batch() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(41));
        let b = w.maybe_load_more().unwrap();
        assert_eq!(b.range, 30..41);
        assert!(!w.is_armed());
    }

    #[test]
    fn category_renders_all_matches_and_disarms() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(100));
        let update = w.set_filter(Filter::parse("city"));
        assert_eq!(update, Update::Render { generation: 2, count: 34 });
        assert!(!w.is_armed());
        assert!(w.visible().all(|it| it.category == "city"));
        assert_eq!(w.maybe_load_more(), None);

        assert_eq!(w.set_filter(Filter::All), Update::Render { generation: 3, count: 30 });
        assert!(w.is_armed());
    }

    #[test]
    fn empty_category_yields_placeholder() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(10));
        assert_eq!(
            w.set_filter(Filter::parse("portrait")),
            Update::Placeholder { generation: 2 }
        );
        assert_eq!(w.visible().count(), 0);
    }

    #[test]
    fn filter_change_strands_in_flight_batch() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(100));
        let stale: Batch = w.maybe_load_more().unwrap();
        w.set_filter(Filter::All);
        assert!(!w.is_loading());
        assert!(!w.finish_batch(&stale));

        let fresh = w.maybe_load_more().unwrap();
        assert_eq!(fresh.range, 30..50);
    }

    #[test]
    fn empty_catalog_is_an_empty_render() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        assert_eq!(w.load(Vec::new()), Update::Render { generation: 1, count: 0 });
        assert!(!w.is_armed());
    }

    #[test]
    fn visible_range_clamps() {
        let mut w = RenderWindow::new(LoaderConfig::default());
        w.load(catalog(100));
        assert_eq!(w.visible_range(28..40).len(), 2);
        assert!(w.visible_range(50..60).is_empty());
    }
}

//! One gallery instance: render window, masonry layout and the event plumbing
//! between them.
//!
//! The host forwards DOM events (scroll, resize, image load) with timestamps,
//! calls [`GallerySession::tick`] from its timers and [`GallerySession::frame`]
//! from its next-frame callback. Nothing here is global, so several sessions
//! can coexist.

use catalog::PhotoItem;
use masonry::{MasonryConfig, MasonryLayout, Measure};
use runtime::{Debouncer, FrameRequests, LayoutRequest};
use tracing::debug;

use crate::scroll::{ScrollMetrics, ScrollTrigger};
use crate::window::{Batch, Filter, LoaderConfig, RenderWindow, Update};

#[derive(Debug)]
pub struct GallerySession {
    window: RenderWindow,
    layout: MasonryLayout,
    frames: FrameRequests,
    scroll: ScrollTrigger,
    resize: Debouncer,
    pending_width: Option<f64>,
}

impl GallerySession {
    pub fn new(loader: LoaderConfig, masonry: MasonryConfig, container_width: f64) -> Self {
        Self {
            scroll: ScrollTrigger::new(loader.scroll_threshold_px, loader.scroll_debounce_ms),
            resize: Debouncer::new(loader.resize_debounce_ms),
            window: RenderWindow::new(loader),
            layout: MasonryLayout::new(masonry, container_width),
            frames: FrameRequests::new(),
            pending_width: None,
        }
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn layout(&self) -> &MasonryLayout {
        &self.layout
    }

    pub fn pending_layout(&self) -> Option<LayoutRequest> {
        self.frames.pending()
    }

    pub fn load(&mut self, items: Vec<PhotoItem>) -> Update {
        let update = self.window.load(items);
        self.scroll.cancel();
        self.frames.request(LayoutRequest::From(0));
        update
    }

    pub fn set_filter(&mut self, filter: Filter) -> Update {
        let update = self.window.set_filter(filter);
        self.scroll.cancel();
        self.frames.request(LayoutRequest::Full);
        update
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now_ms: u64) {
        if self.window.is_armed() {
            self.scroll.on_scroll(metrics, now_ms);
        }
    }

    pub fn on_resize(&mut self, container_width: f64, now_ms: u64) {
        self.pending_width = Some(container_width);
        self.resize.poke(now_ms);
    }

    /// An image finished loading (or failed); its card's height may have changed.
    pub fn on_image_settled(&mut self, index: usize) {
        if index < self.window.rendered() {
            self.frames.request(LayoutRequest::From(index));
        }
    }

    /// Runs due timers. Returns the batch to append if scrolling reached the end.
    pub fn tick(&mut self, now_ms: u64) -> Option<Batch> {
        if self.resize.poll(now_ms)
            && let Some(width) = self.pending_width.take()
        {
            debug!(width, "container resized");
            self.layout.set_container_width(width);
            self.frames.request(LayoutRequest::Full);
        }

        if !self.scroll.poll(now_ms) {
            return None;
        }
        let batch = self.window.maybe_load_more()?;
        self.frames.request(LayoutRequest::From(batch.range.start));
        Some(batch)
    }

    /// Earliest timestamp at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match (self.scroll.deadline_ms(), self.resize.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn finish_batch(&mut self, batch: &Batch) -> bool {
        self.window.finish_batch(batch)
    }

    /// Runs the coalesced layout pass for this frame, if one was requested.
    pub fn frame<M: Measure + ?Sized>(&mut self, measure: &M) -> Option<LayoutRequest> {
        let req = self.frames.take()?;
        let cards = self.window.rendered();
        match req {
            LayoutRequest::Full => self.layout.layout_full(cards, measure),
            LayoutRequest::From(i) => self.layout.layout_from(cards, measure, i),
        };
        Some(req)
    }
}

#[cfg(test)]
mod tests {
    use super::GallerySession;
    use crate::scroll::ScrollMetrics;
    use crate::window::{Filter, LoaderConfig, Update};
    use catalog::PhotoItem;
    use masonry::MasonryConfig;
    use runtime::LayoutRequest;

    fn session(n: usize) -> GallerySession {
        let mut s = GallerySession::new(LoaderConfig::default(), MasonryConfig::default(), 1264.0);
        let items = (0..n)
            .map(|i| PhotoItem::new("nature", format!("{i}.jpg")))
            .collect();
        s.load(items);
        s
    }

    const NEAR_BOTTOM: ScrollMetrics = ScrollMetrics {
        scroll_top: 4000.0,
        viewport_height: 900.0,
        document_height: 5000.0,
    };

    #[test]
    fn scrolling_to_bottom_appends_one_batch() {
        let mut s = session(100);
        assert_eq!(s.frame(&vec![250.0; 100]), Some(LayoutRequest::From(0)));
        assert_eq!(s.layout().placements().len(), 30);

        for t in [0, 20, 40, 60] {
            s.on_scroll(NEAR_BOTTOM, t);
        }
        assert_eq!(s.next_deadline_ms(), Some(160));
        assert_eq!(s.tick(100), None);
        let batch = s.tick(160).unwrap();
        assert_eq!(batch.range, 30..50);
        assert_eq!(s.tick(500), None);

        assert_eq!(s.frame(&vec![250.0; 100]), Some(LayoutRequest::From(30)));
        assert_eq!(s.layout().placements().len(), 50);
        assert!(s.finish_batch(&batch));
    }

    #[test]
    fn small_catalog_ignores_scroll() {
        let mut s = session(25);
        s.on_scroll(NEAR_BOTTOM, 0);
        assert_eq!(s.next_deadline_ms(), None);
        assert_eq!(s.tick(1000), None);
        assert_eq!(s.window().rendered(), 25);
    }

    #[test]
    fn resize_is_debounced_into_full_pass() {
        let mut s = session(10);
        s.frame(&vec![100.0; 10]);
        s.on_resize(800.0, 0);
        s.on_resize(616.0, 100);
        assert_eq!(s.tick(300), None);
        assert_eq!(s.pending_layout(), None);
        s.tick(350);
        assert_eq!(s.frame(&vec![100.0; 10]), Some(LayoutRequest::Full));
        assert_eq!(s.layout().columns(), 2);
    }

    #[test]
    fn image_loads_within_a_frame_coalesce() {
        let mut s = session(40);
        s.frame(&vec![100.0; 40]);
        s.on_image_settled(12);
        s.on_image_settled(4);
        s.on_image_settled(35);
        assert_eq!(s.frame(&vec![100.0; 40]), Some(LayoutRequest::From(4)));
        assert_eq!(s.frame(&vec![100.0; 40]), None);
    }

    #[test]
    fn filter_change_requests_full_layout() {
        let mut s = session(10);
        s.frame(&vec![100.0; 10]);
        s.on_image_settled(3);
        assert_eq!(
            s.set_filter(Filter::parse("city")),
            Update::Placeholder { generation: 2 }
        );
        assert_eq!(s.frame(&Vec::<f64>::new()), Some(LayoutRequest::Full));
        assert_eq!(s.layout().container_height(), 0.0);
    }
}

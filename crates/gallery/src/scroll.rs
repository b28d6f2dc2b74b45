use runtime::Debouncer;

/// Scroll position as reported by the host, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Pixels between the viewport bottom and the document end.
    pub fn distance_to_bottom(&self) -> f64 {
        self.document_height - (self.scroll_top + self.viewport_height)
    }
}

/// Debounced "near the bottom" detector.
///
/// Scroll events only restart the quiet window; the position is evaluated
/// once per burst, using the last reported metrics.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold_px: f64,
    debounce: Debouncer,
    last: Option<ScrollMetrics>,
}

impl ScrollTrigger {
    pub fn new(threshold_px: f64, debounce_ms: u64) -> Self {
        Self {
            threshold_px,
            debounce: Debouncer::new(debounce_ms),
            last: None,
        }
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now_ms: u64) {
        self.last = Some(metrics);
        self.debounce.poke(now_ms);
    }

    /// `true` once per burst if the burst ended within the threshold.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.debounce.poll(now_ms) {
            return false;
        }
        self.last
            .take()
            .is_some_and(|m| m.distance_to_bottom() <= self.threshold_px)
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.debounce.deadline_ms()
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollMetrics, ScrollTrigger};

    #[test]
    fn fires_once_after_burst_near_bottom() {
        let mut t = ScrollTrigger::new(200.0, 100);
        t.on_scroll(ScrollMetrics::new(1000.0, 800.0, 3000.0), 0);
        t.on_scroll(ScrollMetrics::new(2100.0, 800.0, 3000.0), 50);
        assert!(!t.poll(120));
        assert!(t.poll(150));
        assert!(!t.poll(400));
    }

    #[test]
    fn far_from_bottom_does_not_fire() {
        let mut t = ScrollTrigger::new(200.0, 100);
        t.on_scroll(ScrollMetrics::new(0.0, 800.0, 3000.0), 0);
        assert!(!t.poll(100));
        assert_eq!(t.deadline_ms(), None);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(ScrollMetrics::new(2000.0, 800.0, 3000.0).distance_to_bottom(), 200.0);
        let mut t = ScrollTrigger::new(200.0, 100);
        t.on_scroll(ScrollMetrics::new(2000.0, 800.0, 3000.0), 0);
        assert!(t.poll(100));
    }
}

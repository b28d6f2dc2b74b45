//! Card height measurement.
//!
//! The layout engine never touches a rendering surface; it asks a [`Measure`]
//! for each card. A browser host backs it with rendered heights, tests with
//! fixed numbers.

use crate::config::MasonryConfig;

/// Natural pixel size of a card's image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
}

impl IntrinsicSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// What is known about one card's height.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CardMetrics {
    /// Actual rendered height, once the card has been laid out by the host.
    pub rendered: Option<f64>,
    /// Image size, once the image has loaded.
    pub intrinsic: Option<IntrinsicSize>,
}

impl CardMetrics {
    pub fn rendered(height: f64) -> Self {
        Self {
            rendered: Some(height),
            intrinsic: None,
        }
    }

    pub fn intrinsic(width: f64, height: f64) -> Self {
        Self {
            rendered: None,
            intrinsic: Some(IntrinsicSize::new(width, height)),
        }
    }

    /// Rendered height, else an estimate from the image aspect ratio at card
    /// width plus the caption allowance, else the default height.
    pub fn height(&self, config: &MasonryConfig) -> f64 {
        if let Some(h) = self.rendered
            && h.is_finite()
            && h > 0.0
        {
            return h;
        }
        if let Some(size) = self.intrinsic
            && size.width > 0.0
            && size.height > 0.0
        {
            return config.card_width * size.height / size.width + config.caption_allowance;
        }
        config.default_height
    }
}

pub trait Measure {
    /// Metrics for the card at `index` in document order.
    fn measure(&self, index: usize) -> CardMetrics;
}

impl Measure for [CardMetrics] {
    fn measure(&self, index: usize) -> CardMetrics {
        self.get(index).copied().unwrap_or_default()
    }
}

impl Measure for Vec<CardMetrics> {
    fn measure(&self, index: usize) -> CardMetrics {
        self.as_slice().measure(index)
    }
}

/// Rendered heights only; missing indices fall back to estimation.
impl Measure for [f64] {
    fn measure(&self, index: usize) -> CardMetrics {
        self.get(index)
            .map(|h| CardMetrics::rendered(*h))
            .unwrap_or_default()
    }
}

impl Measure for Vec<f64> {
    fn measure(&self, index: usize) -> CardMetrics {
        self.as_slice().measure(index)
    }
}

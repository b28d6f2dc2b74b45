//! Greedy shortest-column packing.
//!
//! Cards are placed in document order, each into the column with the smallest
//! running height (ties go to the lowest index). An incremental pass replays
//! the packing over the cards before the changed one, so the running heights
//! it continues from match what a full pass would have produced.

use tracing::debug;

use crate::config::MasonryConfig;
use crate::measure::Measure;

/// Where one card goes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub column: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout {
    pub config: MasonryConfig,
    container_width: f64,
    column_heights: Vec<f64>,
    placements: Vec<Placement>,
    container_height: f64,
}

impl MasonryLayout {
    pub fn new(config: MasonryConfig, container_width: f64) -> Self {
        Self {
            config,
            container_width,
            column_heights: Vec::new(),
            placements: Vec::new(),
            container_height: 0.0,
        }
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Takes effect on the next pass.
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn columns(&self) -> usize {
        self.config.column_count(self.container_width)
    }

    /// Tallest column after the last pass; 0 when there are no cards.
    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn column_heights(&self) -> &[f64] {
        &self.column_heights
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, index: usize) -> Option<&Placement> {
        self.placements.get(index)
    }

    /// Positions every card from scratch.
    pub fn layout_full<M: Measure + ?Sized>(&mut self, cards: usize, measure: &M) -> &[Placement] {
        self.layout_from(cards, measure, 0)
    }

    /// Positions cards `changed..cards`, after replaying `0..changed` to
    /// rebuild the per-column running heights.
    ///
    /// `changed >= cards` degenerates to a full pass over `cards`.
    pub fn layout_from<M: Measure + ?Sized>(
        &mut self,
        cards: usize,
        measure: &M,
        changed: usize,
    ) -> &[Placement] {
        let columns = self.columns();
        self.column_heights.clear();
        self.column_heights.resize(columns, 0.0);
        self.placements.clear();

        if cards == 0 {
            self.container_height = 0.0;
            debug!("masonry: no cards");
            return &self.placements;
        }

        self.placements.reserve(cards);
        for index in 0..cards {
            let height = measure.measure(index).height(&self.config);
            let placement = self.place(height);
            self.placements.push(placement);
        }

        self.container_height = self.column_heights.iter().copied().fold(0.0, f64::max);
        debug!(
            cards,
            columns,
            replayed = changed.min(cards),
            height = self.container_height,
            "masonry pass"
        );
        &self.placements
    }

    /// Entry point matching `layout(cards, changed_or_none)`.
    pub fn layout<M: Measure + ?Sized>(
        &mut self,
        cards: usize,
        measure: &M,
        changed: Option<usize>,
    ) -> &[Placement] {
        match changed {
            Some(i) => self.layout_from(cards, measure, i),
            None => self.layout_full(cards, measure),
        }
    }

    fn place(&mut self, height: f64) -> Placement {
        let column = shortest_column(&self.column_heights);
        let top = self.column_heights[column];
        self.column_heights[column] = top + height + self.config.gap;
        Placement {
            column,
            left: self.config.column_left(column),
            top,
            width: self.config.card_width,
            height,
        }
    }
}

/// Index of the smallest value; the first one wins ties.
fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    for (i, h) in heights.iter().enumerate().skip(1) {
        if *h < heights[best] {
            best = i;
        }
    }
    best
}

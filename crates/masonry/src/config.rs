#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MasonryConfig {
    /// Fixed width of every card, in CSS pixels.
    pub card_width: f64,
    /// Horizontal and vertical spacing between cards.
    pub gap: f64,
    /// Added to the image height when estimating from intrinsic size.
    pub caption_allowance: f64,
    /// Used when neither a measurement nor an intrinsic size is known.
    pub default_height: f64,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            card_width: 300.0,
            gap: 16.0,
            caption_allowance: 60.0,
            default_height: 400.0,
        }
    }
}

impl MasonryConfig {
    /// Columns that fit in `container_width`; never less than one.
    pub fn column_count(&self, container_width: f64) -> usize {
        let pitch = self.card_width + self.gap;
        if !(pitch > 0.0) || !container_width.is_finite() {
            return 1;
        }
        let n = ((container_width.max(0.0) + self.gap) / pitch).floor();
        (n as usize).max(1)
    }

    /// Left offset of column `column`.
    pub fn column_left(&self, column: usize) -> f64 {
        column as f64 * (self.card_width + self.gap)
    }
}

#[cfg(test)]
mod tests {
    use super::MasonryConfig;

    #[test]
    fn column_count_fits_cards_and_gaps() {
        let cfg = MasonryConfig::default();
        assert_eq!(cfg.column_count(300.0), 1);
        assert_eq!(cfg.column_count(615.0), 1);
        assert_eq!(cfg.column_count(616.0), 2);
        assert_eq!(cfg.column_count(1264.0), 4);
    }

    #[test]
    fn degenerate_widths_give_one_column() {
        let cfg = MasonryConfig::default();
        assert_eq!(cfg.column_count(0.0), 1);
        assert_eq!(cfg.column_count(-50.0), 1);
        assert_eq!(cfg.column_count(f64::NAN), 1);

        let zero = MasonryConfig {
            card_width: 0.0,
            gap: 0.0,
            ..MasonryConfig::default()
        };
        assert_eq!(zero.column_count(1000.0), 1);
    }

    #[test]
    fn column_left_steps_by_pitch() {
        let cfg = MasonryConfig::default();
        assert_eq!(cfg.column_left(0), 0.0);
        assert_eq!(cfg.column_left(2), 632.0);
    }
}

use catalog::{PhotoItem, with_width};

use crate::template::info_tags;

/// Width requested for the enlarged image.
pub const LIGHTBOX_WIDTH: u32 = 1600;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Viewer over the currently visible cards, wrapping at both ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    current: Option<usize>,
}

impl Lightbox {
    pub fn new(visible: usize) -> Self {
        Self {
            len: visible,
            current: None,
        }
    }

    /// Visible card count changed (filtering, appended batches).
    pub fn set_visible(&mut self, visible: usize) {
        self.len = visible;
        if self.current.is_some_and(|i| i >= visible) {
            self.current = None;
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Opens at `index` modulo the visible count; nothing to show keeps it closed.
    pub fn open(&mut self, index: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let i = index.rem_euclid(self.len as isize) as usize;
        self.current = Some(i);
        self.current
    }

    pub fn step(&mut self, delta: isize) -> Option<usize> {
        let i = self.current? as isize;
        self.open(i + delta)
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    /// Keys are ignored while closed. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => {
                self.step(-1);
            }
            Key::ArrowRight => {
                self.step(1);
            }
            Key::Other => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxView {
    pub image_url: String,
    pub info_html: String,
}

impl LightboxView {
    pub fn for_item(item: &PhotoItem) -> Self {
        Self {
            image_url: with_width(&item.src, LIGHTBOX_WIDTH),
            info_html: info_tags(item).concat(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Lightbox, LightboxView};
    use catalog::PhotoItem;

    #[test]
    fn wraps_both_ways() {
        let mut lb = Lightbox::new(3);
        assert_eq!(lb.open(2), Some(2));
        assert_eq!(lb.step(1), Some(0));
        assert_eq!(lb.step(-1), Some(2));
        assert_eq!(lb.open(-1), Some(2));
    }

    #[test]
    fn keys_only_while_open() {
        let mut lb = Lightbox::new(4);
        assert!(!lb.handle_key(Key::ArrowRight));
        lb.open(0);
        assert!(lb.handle_key(Key::from_dom("ArrowLeft")));
        assert_eq!(lb.current(), Some(3));
        assert!(!lb.handle_key(Key::from_dom("Enter")));
        assert!(lb.handle_key(Key::Escape));
        assert!(!lb.is_open());
    }

    #[test]
    fn empty_set_stays_closed() {
        let mut lb = Lightbox::new(0);
        assert_eq!(lb.open(0), None);
        assert_eq!(lb.step(1), None);
    }

    #[test]
    fn shrinking_closes_out_of_range() {
        let mut lb = Lightbox::new(10);
        lb.open(8);
        lb.set_visible(5);
        assert!(!lb.is_open());
    }

    #[test]
    fn view_requests_large_image() {
        let item = PhotoItem::new("city", "./a.jpg?w=600&q=80").with_location("Hong Kong");
        let view = LightboxView::for_item(&item);
        assert_eq!(view.image_url, "./a.jpg?w=1600&q=80");
        assert_eq!(view.info_html, r#"<span class="tag">📍 Hong Kong</span>"#);
    }
}

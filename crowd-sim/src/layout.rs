//! Page geometry
//!
//! Fixed vertical layout of the pledge cards, enough to tell which cards a
//! given scroll position puts fully on screen.

use libcrowdfund::animation::{Rect, Viewport};

/// Page offset of the first pledge card
pub const PLEDGE_SECTION_TOP: f64 = 1_150.0;
pub const CARD_HEIGHT: f64 = 260.0;
pub const CARD_GAP: f64 = 24.0;
pub const CARD_MAX_WIDTH: f64 = 730.0;
pub const SIDE_MARGIN: f64 = 24.0;

#[derive(Debug, Clone)]
pub struct PageLayout {
    viewport: Viewport,
    card_count: usize,
}

impl PageLayout {
    pub fn new(viewport: Viewport, card_count: usize) -> Self {
        Self {
            viewport,
            card_count,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Bounds of card `slot` relative to the viewport once the page is
    /// scrolled down by `scroll_y`.
    pub fn card_rect(&self, slot: usize, scroll_y: f64) -> Rect {
        let width = CARD_MAX_WIDTH.min(self.viewport.width - 2.0 * SIDE_MARGIN).max(0.0);
        let left = (self.viewport.width - width) / 2.0;
        let top = PLEDGE_SECTION_TOP + slot as f64 * (CARD_HEIGHT + CARD_GAP) - scroll_y;
        Rect {
            top,
            left,
            bottom: top + CARD_HEIGHT,
            right: left + width,
        }
    }

    pub fn card_rects(&self, scroll_y: f64) -> impl Iterator<Item = Rect> + '_ {
        (0..self.card_count).map(move |slot| self.card_rect(slot, scroll_y))
    }
}

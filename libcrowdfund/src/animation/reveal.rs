//! Reveal-on-visibility tracking
//!
//! Elements animate in when they scroll into view. `RevealOnce` guards
//! one-shot animations such as the stats counters; `Reveal` drives the
//! pledge cards, which may optionally hide again when they leave the screen.

use serde::Serialize;

/// Element bounds relative to the viewport's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// True when `rect` lies entirely inside `viewport`.
pub fn is_fully_visible(rect: Rect, viewport: Viewport) -> bool {
    rect.top >= 0.0
        && rect.left >= 0.0
        && rect.bottom <= viewport.height
        && rect.right <= viewport.width
}

/// Fires the first time its element becomes visible, never again.
#[derive(Debug, Default, Clone)]
pub struct RevealOnce {
    fired: bool,
}

impl RevealOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an intersection change; returns `true` exactly once, on the first
    /// visible notification.
    pub fn on_intersection(&mut self, visible: bool) -> bool {
        if visible && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    Hidden,
    Shown,
}

#[derive(Debug, Clone)]
pub struct Reveal {
    phase: RevealPhase,
    reverse: bool,
}

impl Reveal {
    /// Starts hidden. With `reverse`, leaving the viewport hides again.
    pub fn new(reverse: bool) -> Self {
        Self {
            phase: RevealPhase::Hidden,
            reverse,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Returns the new phase when the notification changed it.
    pub fn on_intersection(&mut self, intersecting: bool) -> Option<RevealPhase> {
        let next = match (intersecting, self.reverse) {
            (true, _) => RevealPhase::Shown,
            (false, true) => RevealPhase::Hidden,
            (false, false) => self.phase,
        };
        if next == self.phase {
            return None;
        }
        self.phase = next;
        Some(next)
    }
}

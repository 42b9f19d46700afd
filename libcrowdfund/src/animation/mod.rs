//! Animation timelines
//!
//! Frame math for the page's animations, independent of any renderer:
//! the running stats counters and the reveal-on-scroll cards.

pub mod counter;
pub mod reveal;

pub use counter::CounterAnimation;
pub use reveal::{is_fully_visible, Rect, Reveal, RevealOnce, RevealPhase, Viewport};

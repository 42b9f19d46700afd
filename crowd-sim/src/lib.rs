//! crowd-sim library
//!
//! Headless stand-in for the product page: widgets subscribe to the page
//! store and render into a shared screen while a script plays the visitor.

pub mod layout;
pub mod script;
pub mod sim;
pub mod widgets;

// Re-export commonly used types
pub use script::{parse_script, Command};
pub use sim::{CardReveal, OutputFormat, Simulator};
pub use widgets::Screen;

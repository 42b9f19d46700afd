//! Campaign module
//!
//! The concrete model behind the product page:
//! - Actions: what the page's widgets can ask for
//! - State: what the page shows right now
//! - Reducer: pure function (State, Action) -> Result<State, PledgeError>
//!
//! A [`crate::CampaignStore`] wires the three together.

pub mod actions;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::Action;
pub use reducer::reduce;
pub use state::{CampaignState, Pledge, PledgeId};

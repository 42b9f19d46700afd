//! Crowdfund - state container for a crowdfunding product page
//!
//! The heart of this library is [`store::Store`]: a single state value,
//! replaced only through a pure reducer, with subscribers notified after
//! every dispatch. Around it live the page's concrete campaign model and
//! headless versions of the widgets that react to it.

pub mod animation;
pub mod campaign;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use campaign::{reduce, Action, CampaignState, Pledge, PledgeId};
pub use config::Config;
pub use error::{ConfigError, CrowdfundError, PledgeError, Result};
pub use store::{Store, Subscription};

/// Store type used by the page: campaign state driven by the campaign reducer.
pub type CampaignStore = Store<CampaignState, Action, PledgeError>;

/// Create the page's store with the given starting state.
pub fn campaign_store(initial: CampaignState) -> CampaignStore {
    Store::fallible(reduce, initial)
}

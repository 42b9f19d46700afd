//! Campaign state
//!
//! Immutable state structure for the product page. All state transitions
//! happen through the reducer (see `reducer.rs`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a pledge tier, e.g. `bamboo-stand`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PledgeId(String);

impl PledgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PledgeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PledgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PledgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One backing option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pledge {
    pub id: PledgeId,

    /// Display name, e.g. "Bamboo Stand"
    pub name: String,

    /// Smallest accepted amount in dollars. Zero for the no-reward tier.
    pub min_amount: u64,

    /// Rewards still available
    pub left_count: u32,
}

impl Pledge {
    pub fn new(id: &str, name: &str, min_amount: u64, left_count: u32) -> Self {
        Self {
            id: PledgeId::from(id),
            name: name.to_string(),
            min_amount,
            left_count,
        }
    }

    /// Tiers with a minimum amount ship a reward and have limited stock.
    pub fn is_reward(&self) -> bool {
        self.min_amount > 0
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.is_reward() && self.left_count == 0
    }
}

/// Root page state
///
/// This is the single source of truth shared by every widget on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignState {
    /// Has the visitor bookmarked the project?
    pub is_bookmarked: bool,

    /// Tier currently highlighted in the back-project modal
    pub selected_pledge: Option<PledgeId>,

    /// Available tiers, in display order
    pub pledges: Vec<Pledge>,

    /// Total backed, in dollars
    pub backed_amount: u64,

    /// Total number of backers
    pub backers_count: u64,

    /// Funding goal, in dollars
    pub goal: u64,

    /// Should the "thank you" modal be shown?
    pub feedback_pending: bool,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            is_bookmarked: false,
            selected_pledge: None,
            pledges: default_pledges(),
            backed_amount: 89_914,
            backers_count: 5_007,
            goal: 100_000,
            feedback_pending: false,
        }
    }
}

/// Tiers offered by the page out of the box
pub fn default_pledges() -> Vec<Pledge> {
    vec![
        Pledge::new("no-reward", "Pledge with no reward", 0, 0),
        Pledge::new("bamboo-stand", "Bamboo Stand", 25, 101),
        Pledge::new("black-edition", "Black Edition Stand", 75, 64),
        Pledge::new("mahogany", "Mahogany Special Edition", 200, 0),
    ]
}

impl CampaignState {
    /// Create new campaign state with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pledge(&self, id: &PledgeId) -> Option<&Pledge> {
        self.pledges.iter().find(|pledge| &pledge.id == id)
    }

    pub fn is_selected(&self, id: &PledgeId) -> bool {
        self.selected_pledge.as_ref() == Some(id)
    }

    /// Share of the goal already backed, as a percentage clamped to 0..=100.
    pub fn progress(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        let percent = self.backed_amount as f64 / self.goal as f64 * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

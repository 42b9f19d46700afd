//! Actions for the campaign reducer
//!
//! Every change to the page's state is described by one of these values.
//! Widgets build them from user interactions and hand them to the store.

use super::state::PledgeId;

/// Actions that trigger campaign state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Bookmark button pressed.
    ///
    /// `Some(flag)` forces the bookmark on or off, `None` flips it.
    BookmarkToggle(Option<bool>),

    /// A pledge tier was picked in the modal, or the selection was cleared
    /// (`None`) because the modal closed.
    PledgeSelected(Option<PledgeId>),

    /// The visitor confirmed an amount for a tier
    PledgeEntered { pledge_id: PledgeId, amount: u64 },

    /// The "thank you" modal was dismissed
    FeedbackClosed,
}

impl Action {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::BookmarkToggle(_) => "bookmark_toggle",
            Action::PledgeSelected(_) => "pledge_selected",
            Action::PledgeEntered { .. } => "pledge_entered",
            Action::FeedbackClosed => "feedback_closed",
        }
    }
}

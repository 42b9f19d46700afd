//! Pure reducer function for campaign state transitions
//!
//! The reducer is a pure function:
//! `(State, Action) -> Result<State, PledgeError>`
//!
//! It has no side effects. Refusing an action is a value, not a panic, so the
//! store can leave its state untouched and hand the error to the dispatcher.

use super::actions::Action;
use super::state::{CampaignState, PledgeId};
use crate::error::PledgeError;

/// Pure reducer function
///
/// Takes the current state and an action, returns the next state or the
/// reason the action was refused.
pub fn reduce(state: CampaignState, action: Action) -> Result<CampaignState, PledgeError> {
    match action {
        Action::BookmarkToggle(flag) => Ok(CampaignState {
            is_bookmarked: flag.unwrap_or(!state.is_bookmarked),
            ..state
        }),

        Action::PledgeSelected(None) => Ok(CampaignState {
            selected_pledge: None,
            ..state
        }),

        Action::PledgeSelected(Some(id)) => {
            check_available(&state, &id)?;
            Ok(CampaignState {
                selected_pledge: Some(id),
                ..state
            })
        }

        Action::PledgeEntered { pledge_id, amount } => enter_pledge(state, pledge_id, amount),

        Action::FeedbackClosed => Ok(CampaignState {
            feedback_pending: false,
            ..state
        }),
    }
}

/// Fails unless `id` names a tier that can still be backed.
fn check_available(state: &CampaignState, id: &PledgeId) -> Result<(), PledgeError> {
    match state.pledge(id) {
        None => Err(PledgeError::UnknownPledge(id.clone())),
        Some(pledge) if pledge.is_out_of_stock() => Err(PledgeError::OutOfStock(id.clone())),
        Some(_) => Ok(()),
    }
}

fn enter_pledge(
    state: CampaignState,
    pledge_id: PledgeId,
    amount: u64,
) -> Result<CampaignState, PledgeError> {
    check_available(&state, &pledge_id)?;

    let mut pledges = state.pledges.clone();
    let Some(pledge) = pledges.iter_mut().find(|p| p.id == pledge_id) else {
        return Err(PledgeError::UnknownPledge(pledge_id));
    };

    if amount < pledge.min_amount {
        return Err(PledgeError::BelowMinimum {
            min: pledge.min_amount,
            pledge: pledge_id,
            amount,
        });
    }

    let totals = state
        .backed_amount
        .checked_add(amount)
        .zip(state.backers_count.checked_add(1));
    let Some((backed_amount, backers_count)) = totals else {
        return Err(PledgeError::AmountOverflow {
            pledge: pledge_id,
            amount,
        });
    };

    if pledge.is_reward() {
        pledge.left_count -= 1;
    }

    Ok(CampaignState {
        pledges,
        backed_amount,
        backers_count,
        feedback_pending: true,
        ..state
    })
}

//! Widget view models
//!
//! Pure projections of [`CampaignState`] into what each widget on the page
//! displays. A widget subscribes to the store, reads the state, and renders
//! one of these.

use serde::Serialize;

use crate::campaign::{CampaignState, Pledge};

/// Modifier class applied to the bookmark button while bookmarked
pub const BOOKMARK_MARKED_CLASS: &str = "bookmark-btn--marked";

/// Viewport width at which the long product description kicks in
pub const DESCRIPTION_BREAKPOINT: u32 = 768;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkView {
    pub marked: bool,
    /// Accessible label of the button
    pub label: &'static str,
    pub css_class: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    /// e.g. `$89,914`
    pub backed_amount: String,
    /// e.g. `5,007`
    pub backers: String,
    /// e.g. `$100,000`
    pub goal: String,
    /// Percentage of the goal, 0..=100
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PledgeView {
    pub id: String,
    pub name: String,
    pub min_amount: u64,
    pub left_count: u32,
    pub selected: bool,
    pub out_of_stock: bool,
    pub button_label: &'static str,
    /// Final opacity of the card once revealed
    pub opacity: f64,
}

pub fn bookmark_view(state: &CampaignState) -> BookmarkView {
    if state.is_bookmarked {
        BookmarkView {
            marked: true,
            label: "Remove from bookmarks",
            css_class: Some(BOOKMARK_MARKED_CLASS),
        }
    } else {
        BookmarkView {
            marked: false,
            label: "Bookmark",
            css_class: None,
        }
    }
}

pub fn stats_view(state: &CampaignState) -> StatsView {
    StatsView {
        backed_amount: format_dollars(state.backed_amount),
        backers: format_thousands(state.backers_count),
        goal: format_dollars(state.goal),
        progress: state.progress(),
    }
}

pub fn pledge_view(state: &CampaignState, pledge: &Pledge) -> PledgeView {
    let out_of_stock = pledge.is_out_of_stock();
    PledgeView {
        id: pledge.id.to_string(),
        name: pledge.name.clone(),
        min_amount: pledge.min_amount,
        left_count: pledge.left_count,
        selected: state.is_selected(&pledge.id),
        out_of_stock,
        button_label: if out_of_stock { "Out of stock" } else { "Select Reward" },
        opacity: if out_of_stock { 0.5 } else { 1.0 },
    }
}

/// Views for every tier, in display order.
pub fn pledge_views(state: &CampaignState) -> Vec<PledgeView> {
    state
        .pledges
        .iter()
        .map(|pledge| pledge_view(state, pledge))
        .collect()
}

/// Wording of the product description for a given viewport width.
pub fn description_twist(viewport_width: u32) -> &'static str {
    if viewport_width >= DESCRIPTION_BREAKPOINT {
        "beautiful &"
    } else {
        "beautifully"
    }
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_dollars(value: u64) -> String {
    format!("${}", format_thousands(value))
}

//! Page widgets
//!
//! Each widget subscribes to the store once at mount time and re-renders its
//! own slot of the shared [`Screen`] on every notification. Widgets never
//! talk to each other; they only read the store.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use libcrowdfund::view::{self, BookmarkView, PledgeView, StatsView};
use libcrowdfund::{Action, CampaignState, CampaignStore, PledgeId};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalView {
    /// Back-project modal open?
    pub open: bool,
    pub selected: Option<String>,
    /// "Thank you" modal open?
    pub feedback_open: bool,
}

/// Everything currently rendered on the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub bookmark: BookmarkView,
    pub stats: StatsView,
    pub pledges: Vec<PledgeView>,
    pub modal: ModalView,
    pub description: &'static str,
}

impl Screen {
    /// First paint, before any widget has been notified.
    pub fn render(state: &CampaignState, viewport_width: u32) -> Self {
        Self {
            bookmark: view::bookmark_view(state),
            stats: view::stats_view(state),
            pledges: view::pledge_views(state),
            modal: modal_view(state),
            description: view::description_twist(viewport_width),
        }
    }

    /// Plain-text rendering, one widget per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("[bookmark] {}\n", self.bookmark.label));
        out.push_str(&format!(
            "[stats] {} of {} backed | {} backers | {:.1}%\n",
            self.stats.backed_amount, self.stats.goal, self.stats.backers, self.stats.progress
        ));
        for pledge in &self.pledges {
            let marker = if pledge.selected { " (selected)" } else { "" };
            out.push_str(&format!(
                "[pledge {}] {} | min {} | {} left | {}{}\n",
                pledge.id,
                pledge.name,
                view::format_dollars(pledge.min_amount),
                pledge.left_count,
                pledge.button_label,
                marker
            ));
        }
        out.push_str(&format!(
            "[modal] {} | [feedback] {}\n",
            if self.modal.open { "open" } else { "closed" },
            if self.modal.feedback_open { "shown" } else { "hidden" }
        ));
        out.push_str(&format!("[description] {}\n", self.description));
        out
    }
}

fn modal_view(state: &CampaignState) -> ModalView {
    ModalView {
        open: state.selected_pledge.is_some(),
        selected: state.selected_pledge.as_ref().map(PledgeId::to_string),
        feedback_open: state.feedback_pending,
    }
}

/// Paint the screen and subscribe every widget to `store`.
pub fn mount(store: &CampaignStore, viewport_width: u32) -> Rc<RefCell<Screen>> {
    let state = store.get_state();
    let screen = Rc::new(RefCell::new(Screen::render(&state, viewport_width)));

    mount_bookmark(store, &screen);
    mount_stats(store, &screen);
    for (slot, pledge) in state.pledges.iter().enumerate() {
        mount_pledge(store, &screen, slot, pledge.id.clone());
    }
    mount_modal(store, &screen);

    debug!(subscribers = store.subscriber_count(), "Widgets mounted");
    screen
}

fn mount_bookmark(store: &CampaignStore, screen: &Rc<RefCell<Screen>>) {
    let store_handle = store.clone();
    let screen = Rc::clone(screen);
    store.subscribe(move || {
        let state = store_handle.get_state();
        screen.borrow_mut().bookmark = view::bookmark_view(&state);
    });
}

fn mount_stats(store: &CampaignStore, screen: &Rc<RefCell<Screen>>) {
    let store_handle = store.clone();
    let screen = Rc::clone(screen);
    store.subscribe(move || {
        let state = store_handle.get_state();
        screen.borrow_mut().stats = view::stats_view(&state);
    });
}

fn mount_pledge(store: &CampaignStore, screen: &Rc<RefCell<Screen>>, slot: usize, id: PledgeId) {
    let store_handle = store.clone();
    let screen = Rc::clone(screen);
    store.subscribe(move || {
        let state = store_handle.get_state();
        let Some(pledge) = state.pledge(&id) else {
            warn!(pledge = %id, "Pledge disappeared from state");
            return;
        };
        screen.borrow_mut().pledges[slot] = view::pledge_view(&state, pledge);
    });
}

/// The back-project modal closes itself when a pledge goes through, which
/// clears the selection from inside the notification. A new backer is how a
/// pledge shows up in the state; later selections leave the modal open.
fn mount_modal(store: &CampaignStore, screen: &Rc<RefCell<Screen>>) {
    let store_handle = store.clone();
    let screen = Rc::clone(screen);
    let seen_backers = Cell::new(store.get_state().backers_count);
    store.subscribe(move || {
        let state = store_handle.get_state();
        screen.borrow_mut().modal = modal_view(&state);

        let pledge_entered = state.backers_count != seen_backers.replace(state.backers_count);
        if pledge_entered && state.selected_pledge.is_some() {
            debug!("Pledge accepted, closing back-project modal");
            if let Err(e) = store_handle.dispatch(Action::PledgeSelected(None)) {
                warn!(error = %e, "Failed to close back-project modal");
            }
        }
    });
}

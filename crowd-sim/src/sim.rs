//! Script runner
//!
//! Owns the page store and the mounted widgets, and plays script commands
//! against them the way the page's event handlers would.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use libcrowdfund::animation::{
    is_fully_visible, CounterAnimation, Reveal, RevealOnce, RevealPhase, Viewport,
};
use libcrowdfund::config::AnimationConfig;
use libcrowdfund::view::{format_dollars, format_thousands};
use libcrowdfund::{campaign_store, CampaignState, CampaignStore, PledgeError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::layout::PageLayout;
use crate::script::Command;
use crate::widgets::{self, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: '{}'. Valid options: text, json", s)),
        }
    }
}

/// Counter frames produced by one `animate` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterFrames {
    pub backed_amount: Vec<u64>,
    pub backers: Vec<u64>,
}

/// A pledge card that appeared or disappeared after a scroll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardReveal {
    pub pledge: String,
    pub phase: RevealPhase,
    /// Opacity the card ends up with
    pub opacity: f64,
}

/// Summary of a finished run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub dispatched: usize,
    pub rejected: usize,
}

pub struct Simulator {
    store: CampaignStore,
    screen: Rc<RefCell<Screen>>,
    animation: AnimationConfig,
    counters: RevealOnce,
    layout: PageLayout,
    cards: Vec<Reveal>,
    format: OutputFormat,
}

impl Simulator {
    pub fn new(
        state: CampaignState,
        animation: AnimationConfig,
        viewport: Viewport,
        format: OutputFormat,
    ) -> Self {
        let card_count = state.pledges.len();
        let cards = (0..card_count)
            .map(|_| Reveal::new(animation.reveal_reverse))
            .collect();
        let store = campaign_store(state);
        let screen = widgets::mount(&store, viewport.width as u32);

        let mut simulator = Self {
            store,
            screen,
            animation,
            counters: RevealOnce::new(),
            layout: PageLayout::new(viewport, card_count),
            cards,
            format,
        };
        // Cards already on screen at load are revealed without a scroll.
        simulator.scroll(0.0);
        simulator
    }

    pub fn store(&self) -> &CampaignStore {
        &self.store
    }

    pub fn screen(&self) -> Screen {
        self.screen.borrow().clone()
    }

    /// Run every command, then print the final screen.
    ///
    /// Refused pledges are reported on `err` and do not stop the script.
    pub fn run<W: Write, E: Write>(
        &mut self,
        commands: &[(usize, Command)],
        out: &mut W,
        err: &mut E,
    ) -> std::io::Result<RunReport> {
        let mut report = RunReport::default();

        for (line, command) in commands {
            match command.action() {
                Some(action) => {
                    let kind = action.kind();
                    match self.store.dispatch(action) {
                        Ok(()) => {
                            report.dispatched += 1;
                            info!(line, action = kind, "Dispatched");
                        }
                        Err(e) => {
                            report.rejected += 1;
                            self.report_rejection(*line, &e, err)?;
                        }
                    }
                }
                None => match command {
                    Command::Animate => self.animate(out)?,
                    Command::Scroll(y) => {
                        let reveals = self.scroll(f64::from(*y));
                        self.print_reveals(&reveals, out)?;
                    }
                    Command::Show => self.show(out)?,
                    _ => {}
                },
            }
        }

        self.show(out)?;
        Ok(report)
    }

    fn report_rejection<E: Write>(
        &self,
        line: usize,
        error: &PledgeError,
        err: &mut E,
    ) -> std::io::Result<()> {
        warn!(line, error = %error, "Action refused");
        writeln!(err, "line {}: pledge rejected: {}", line, error)
    }

    /// Stats counters run the first time they come into view only.
    pub fn counter_frames(&mut self) -> Option<CounterFrames> {
        if !self.counters.on_intersection(true) {
            return None;
        }
        let state = self.store.get_state();
        let duration = self.animation.counter_duration();
        let interval = self.animation.frame_interval();

        Some(CounterFrames {
            backed_amount: CounterAnimation::new(state.backed_amount, duration)
                .frames(interval)
                .collect(),
            backers: CounterAnimation::new(state.backers_count, duration)
                .frames(interval)
                .collect(),
        })
    }

    fn animate<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let Some(frames) = self.counter_frames() else {
            info!("Counters already animated, skipping");
            return Ok(());
        };

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "animation": frames });
                writeln!(out, "{}", json)
            }
            OutputFormat::Text => {
                let backed: Vec<String> = frames.backed_amount.iter().map(|v| format_dollars(*v)).collect();
                let backers: Vec<String> = frames.backers.iter().map(|v| format_thousands(*v)).collect();
                writeln!(out, "[animate] backed {}", backed.join(" "))?;
                writeln!(out, "[animate] backers {}", backers.join(" "))
            }
        }
    }

    /// Scroll to `scroll_y` and feed every card's visibility to its reveal
    /// tracker. Returns the cards whose phase changed.
    pub fn scroll(&mut self, scroll_y: f64) -> Vec<CardReveal> {
        let viewport = self.layout.viewport();
        let screen = self.screen.borrow();
        let mut changed = Vec::new();

        for ((rect, card), view) in self
            .layout
            .card_rects(scroll_y)
            .zip(self.cards.iter_mut())
            .zip(screen.pledges.iter())
        {
            if let Some(phase) = card.on_intersection(is_fully_visible(rect, viewport)) {
                let opacity = match phase {
                    RevealPhase::Shown => view.opacity,
                    RevealPhase::Hidden => 0.0,
                };
                changed.push(CardReveal {
                    pledge: view.id.clone(),
                    phase,
                    opacity,
                });
            }
        }
        debug!(scroll_y, changed = changed.len(), "Scrolled");
        changed
    }

    fn print_reveals<W: Write>(&self, reveals: &[CardReveal], out: &mut W) -> std::io::Result<()> {
        for reveal in reveals {
            match self.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({ "reveal": reveal });
                    writeln!(out, "{}", json)?;
                }
                OutputFormat::Text => {
                    let phase = match reveal.phase {
                        RevealPhase::Shown => "shown",
                        RevealPhase::Hidden => "hidden",
                    };
                    writeln!(
                        out,
                        "[reveal] {} {} | opacity {}",
                        reveal.pledge, phase, reveal.opacity
                    )?;
                }
            }
        }
        Ok(())
    }

    fn show<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let screen = self.screen.borrow();
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "screen": &*screen });
                writeln!(out, "{}", json)
            }
            OutputFormat::Text => write!(out, "{}", screen.to_text()),
        }
    }
}

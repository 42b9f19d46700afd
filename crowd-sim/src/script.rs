//! Script format
//!
//! One command per line. Blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! bookmark            # flip the bookmark
//! bookmark on|off
//! select <pledge-id>  # open the modal on a tier
//! select none         # close the modal
//! pledge <pledge-id> <amount>
//! close-feedback
//! animate             # run the stats counters (once)
//! scroll <y>          # scroll the page to <y> pixels
//! show                # print the screen
//! ```

use libcrowdfund::{Action, CrowdfundError, PledgeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bookmark(Option<bool>),
    Select(Option<PledgeId>),
    Pledge { pledge_id: PledgeId, amount: u64 },
    CloseFeedback,
    Animate,
    Scroll(u32),
    Show,
}

impl Command {
    /// Store action for commands that change state.
    pub fn action(&self) -> Option<Action> {
        match self {
            Command::Bookmark(flag) => Some(Action::BookmarkToggle(*flag)),
            Command::Select(id) => Some(Action::PledgeSelected(id.clone())),
            Command::Pledge { pledge_id, amount } => Some(Action::PledgeEntered {
                pledge_id: pledge_id.clone(),
                amount: *amount,
            }),
            Command::CloseFeedback => Some(Action::FeedbackClosed),
            Command::Animate | Command::Scroll(_) | Command::Show => None,
        }
    }
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["bookmark"] => Command::Bookmark(None),
        ["bookmark", "on"] => Command::Bookmark(Some(true)),
        ["bookmark", "off"] => Command::Bookmark(Some(false)),
        ["bookmark", other] => {
            return Err(format!("expected 'on' or 'off', got '{}'", other));
        }
        ["select", "none"] => Command::Select(None),
        ["select", id] => Command::Select(Some(PledgeId::from(*id))),
        ["pledge", id, amount] => {
            let amount = amount
                .trim_start_matches('$')
                .parse::<u64>()
                .map_err(|_| format!("invalid amount '{}'", amount))?;
            Command::Pledge {
                pledge_id: PledgeId::from(*id),
                amount,
            }
        }
        ["close-feedback"] => Command::CloseFeedback,
        ["animate"] => Command::Animate,
        ["scroll", y] => {
            let y = y
                .parse::<u32>()
                .map_err(|_| format!("invalid scroll offset '{}'", y))?;
            Command::Scroll(y)
        }
        ["show"] => Command::Show,
        [name, ..] => return Err(format!("unknown or malformed command '{}'", name)),
        [] => return Ok(None),
    };
    Ok(Some(command))
}

/// Parse a whole script, keeping 1-based line numbers for reporting.
///
/// The first bad line aborts parsing so nothing runs from a broken script.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>, CrowdfundError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        match parse_line(line) {
            Ok(Some(command)) => commands.push((line_no, command)),
            Ok(None) => {}
            Err(reason) => {
                return Err(CrowdfundError::InvalidInput(format!(
                    "line {}: {}",
                    line_no, reason
                )));
            }
        }
    }
    Ok(commands)
}

//! Inbound chat commands
//!
//! [`dispatch`] is a pure decision: who sent what, and what to do about it.
//! [`poller::UpdatePoller`] feeds it from the chat transport and carries out
//! the resulting [`Action`].

pub mod poller;

pub use poller::{UpdatePoller, UpdateSource};

/// What to do with an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Unknown sender or unknown command; no reply
    Ignore,
    /// Fetch and report current availability
    Status,
    /// Reply with the command overview
    Help,
}

/// Decide how to answer `text` sent from `sender_id`
///
/// Only `allowed_id` gets any reaction. Commands may carry a `@botname`
/// suffix and trailing arguments, both ignored.
pub fn dispatch(allowed_id: i64, sender_id: i64, text: &str) -> Action {
    if sender_id != allowed_id {
        return Action::Ignore;
    }

    let Some(command) = text.split_whitespace().next() else {
        return Action::Ignore;
    };
    let command = command.split('@').next().unwrap_or(command);

    match command.to_lowercase().as_str() {
        "/status" => Action::Status,
        "/help" | "/start" => Action::Help,
        _ => Action::Ignore,
    }
}

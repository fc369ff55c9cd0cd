//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function. They come from the keyboard,
//! the signal and ticker actors, and background command completions.

use crossterm::event::KeyEvent;

use crate::repo::{CloneResult, RepoListing};

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // From background actors
    /// Spinner animation tick.
    Tick,
    /// Ctrl-C / SIGINT.
    Interrupt,

    /// Kick off the run: dispatch the repository lookup.
    Start,

    // Command completion callbacks
    /// The lookup returned (possibly partial, possibly empty) and the
    /// destination is ready.
    ReposListed(RepoListing),
    LookupFailed(String),
    DestinationFailed(String),
    /// One repository finished cloning, successfully or not.
    CloneFinished(CloneResult),
}

impl From<CloneResult> for Message {
    fn from(result: CloneResult) -> Self {
        Message::CloneFinished(result)
    }
}

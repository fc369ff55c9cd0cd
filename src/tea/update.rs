//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute. It is the only place the
//! progress state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::repo::RepoListing;

use super::command::Command;
use super::message::Message;
use super::model::{FatalReason, Model, ProgressState};

/// Pure update function: Model + Message → Commands
///
/// Once the state is terminal, every message except quit keys and
/// interrupts is ignored, so late clone results cannot change it.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => update_key(model, key, &mut cmds),

        // The next frame lays itself out for the new size.
        Message::Resize(..) => model.dirty = true,

        Message::Tick => {
            if !model.state.is_terminal() {
                model.spinner_frame = model.spinner_frame.wrapping_add(1);
                model.dirty = true;
            }
        }

        Message::Interrupt => {
            if model.state.is_terminal() {
                cmds.push(Command::Quit);
            } else {
                cancel(model, &mut cmds);
            }
        }

        Message::Start => {
            if model.state == ProgressState::Loading {
                tracing::info!("gathering repositories of {}...", model.org);
                transition(model, ProgressState::Listing);
                cmds.push(Command::ListRepos);
            }
        }

        Message::ReposListed(listing) => {
            if model.state.is_gathering() {
                repos_listed(model, listing, &mut cmds);
            } else {
                tracing::debug!("ignoring repository listing in state {}", model.state.label());
            }
        }

        Message::LookupFailed(reason) => {
            if model.state.is_gathering() {
                tracing::error!("Critical error: {}", reason);
                fatal(model, FatalReason::LookupFailed(reason), &mut cmds);
            }
        }

        Message::DestinationFailed(reason) => {
            if model.state.is_gathering() {
                tracing::error!("Critical error: {}", reason);
                fatal(model, FatalReason::DirectoryPrepFailed(reason), &mut cmds);
            }
        }

        Message::CloneFinished(result) => {
            let ProgressState::Cloning {
                completed,
                total,
                failures,
            } = &mut model.state
            else {
                tracing::debug!("discarding late result for {}", result.repository.name);
                return cmds;
            };

            *completed += 1;
            if let Some(failure) = result.failure_entry() {
                failures.push(failure);
            }
            model.dirty = true;

            if *completed >= *total {
                let done = ProgressState::Done {
                    total: *total,
                    failures: std::mem::take(failures),
                };
                transition(model, done);
                finish(model, &mut cmds);
            }
        }
    }

    cmds
}

fn update_key(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    let quit_key = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
    if !quit_key {
        return;
    }

    model.dirty = true;
    if model.state.is_terminal() {
        cmds.push(Command::Quit);
    } else {
        cancel(model, cmds);
    }
}

fn repos_listed(model: &mut Model, listing: RepoListing, cmds: &mut Vec<Command>) {
    model.skipped_pages = listing.skipped_pages;
    let total = listing.repos.len();

    if total == 0 {
        tracing::warn!("No repositories found for {}", model.org);
        transition(
            model,
            ProgressState::Done {
                total: 0,
                failures: Vec::new(),
            },
        );
        finish(model, cmds);
        return;
    }

    transition(
        model,
        ProgressState::Cloning {
            completed: 0,
            total,
            failures: Vec::new(),
        },
    );
    cmds.push(Command::StartCloning {
        repos: listing.repos,
    });
}

fn cancel(model: &mut Model, cmds: &mut Vec<Command>) {
    tracing::warn!("run cancelled in state {}", model.state.label());
    transition(model, ProgressState::Fatal(FatalReason::Cancelled));
    cmds.push(Command::CancelClones);
    cmds.push(Command::Quit);
}

fn fatal(model: &mut Model, reason: FatalReason, cmds: &mut Vec<Command>) {
    transition(model, ProgressState::Fatal(reason));
    finish(model, cmds);
}

/// Plain runs exit as soon as the run is over; a TUI keeps the final view
/// up until a key is pressed.
fn finish(model: &Model, cmds: &mut Vec<Command>) {
    if !model.interactive {
        cmds.push(Command::Quit);
    }
}

fn transition(model: &mut Model, next: ProgressState) {
    tracing::debug!("state {} -> {}", model.state.label(), next.label());
    model.state = next;
    model.dirty = true;
}

//! Terminal input actor.
//!
//! Reads crossterm's async event stream and forwards key presses and resizes.
//! Only spawned when a TUI owns the terminal (raw mode), where Ctrl-C arrives
//! as a key event instead of a signal.

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tea::Message;

use super::ActorHandle;

pub struct InputActor {
    msg_tx: mpsc::UnboundedSender<Message>,
}

impl InputActor {
    pub fn new(msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { msg_tx }
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            let mut events = EventStream::new();
            loop {
                tokio::select! {
                    _ = cancel_clone.cancelled() => break,
                    next = events.next() => {
                        let Some(next) = next else { break };
                        let event = match next {
                            Ok(event) => event,
                            Err(e) => {
                                tracing::warn!("terminal event error: {}", e);
                                continue;
                            }
                        };
                        let Some(msg) = to_message(event) else { continue };
                        if self.msg_tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("InputActor stopped");
        });

        ActorHandle::new(cancel)
    }
}

fn to_message(event: Event) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Message::Key(key)),
        Event::Resize(width, height) => Some(Message::Resize(width, height)),
        _ => None,
    }
}

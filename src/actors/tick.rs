//! Spinner tick actor.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::tea::Message;

use super::ActorHandle;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Sends `Message::Tick` at a fixed interval so the spinner animates.
pub struct TickActor {
    msg_tx: mpsc::UnboundedSender<Message>,
    interval: Duration,
}

impl TickActor {
    pub fn new(msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            msg_tx,
            interval: TICK_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_clone.cancelled() => break,
                    _ = interval.tick() => {
                        if self.msg_tx.send(Message::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("TickActor stopped");
        });

        ActorHandle::new(cancel)
    }
}

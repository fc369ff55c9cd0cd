//! OS interrupt actor.
//!
//! In plain mode Ctrl-C reaches the process as SIGINT rather than as a key
//! event; this actor turns it into `Message::Interrupt`. A second interrupt
//! is forwarded as well, so a terminal state can still be left.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tea::Message;

use super::ActorHandle;

pub struct SignalActor {
    msg_tx: mpsc::UnboundedSender<Message>,
}

impl SignalActor {
    pub fn new(msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { msg_tx }
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel_clone.cancelled() => break,
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            tracing::warn!("cannot listen for interrupts: {}", e);
                            break;
                        }
                        tracing::info!("interrupt received");
                        if self.msg_tx.send(Message::Interrupt).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("SignalActor stopped");
        });

        ActorHandle::new(cancel)
    }
}

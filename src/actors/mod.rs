//! Actor system for background input sources.
//!
//! Each actor is an independent tokio task that only sends messages to the
//! event loop; none of them touch application state. Actors handle:
//! - Terminal keyboard and resize events (InputActor, TUI only)
//! - OS interrupt signals (SignalActor)
//! - Spinner ticks (TickActor)

pub mod input;
pub mod signal;
pub mod tick;

use tokio_util::sync::CancellationToken;

pub use input::InputActor;
pub use signal::SignalActor;
pub use tick::TickActor;

/// Handle to a running actor, used for graceful shutdown.
pub struct ActorHandle {
    cancel: CancellationToken,
}

impl ActorHandle {
    /// Create a new actor handle with a cancellation token.
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Signal the actor to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Stop every actor in the list.
pub fn shutdown_all(actors: &[ActorHandle]) {
    tracing::debug!("shutting down {} actors", actors.len());
    for actor in actors {
        actor.shutdown();
    }
}

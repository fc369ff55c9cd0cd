use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::tea::ProgressState;

// Version 0 belongs to `RenderState::default()`; real snapshots start at 1.
static VERSION_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Read-only view of a run, handed to whatever renders it.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub version: u64,
    pub org: String,
    pub destination: String,
    pub state: ProgressState,
    pub skipped_pages: usize,
    pub spinner_frame: usize,
    pub interactive: bool,
}

/// Sending half of the snapshot channel.
///
/// Built over a bounded(1) channel it keeps only the latest snapshot
/// (latest-wins, for the TUI); over an unbounded channel every snapshot is
/// delivered (for plain output).
#[derive(Clone)]
pub struct StateSender {
    tx: Sender<RenderState>,
    drain: Option<Receiver<RenderState>>,
}

impl StateSender {
    pub fn latest_wins() -> (Self, Receiver<RenderState>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (
            Self {
                tx,
                drain: Some(rx.clone()),
            },
            rx,
        )
    }

    pub fn every_state() -> (Self, Receiver<RenderState>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx, drain: None }, rx)
    }

    /// Never blocks.
    pub fn send(&self, state: RenderState) {
        match self.tx.try_send(state) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(state)) => {
                if let Some(drain) = &self.drain {
                    let _ = drain.try_recv();
                }
                let _ = self.tx.try_send(state);
            }
        }
    }
}

//! Server state machine.
//!
//! # States
//! ```text
//! Starting → Running → ShuttingDown → Stopped
//! ```
//!
//! Running may be skipped when the server dies before it starts
//! accepting. Backward transitions are rejected.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServerState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

/// Owner of the current [`ServerState`]; observers hold a `watch::Receiver`.
#[derive(Debug)]
pub struct StateTracker {
    tx: watch::Sender<ServerState>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ServerState::Starting);
        Self { tx }
    }

    pub fn current(&self) -> ServerState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.tx.subscribe()
    }

    /// Move forward to `next`. Returns `false` (and changes nothing) when
    /// `next` is not strictly after the current state.
    pub fn advance(&self, next: ServerState) -> bool {
        let mut previous = None;
        self.tx.send_if_modified(|state| {
            if next > *state {
                previous = Some(*state);
                *state = next;
                true
            } else {
                false
            }
        });

        match previous {
            Some(from) => {
                tracing::info!(from = ?from, to = ?next, "Server state changed");
                true
            }
            None => {
                tracing::warn!(current = ?self.current(), requested = ?next, "Ignoring backward state transition");
                false
            }
        }
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//! # Event bus for coordinator events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`] so the coordinator, operation runners and
//! subscriber workers can publish without blocking.
//!
//! ```text
//! Publishers (many):                   Consumer (one):
//!   run task      ──┐
//!   operation 1   ──┼──────► Bus ───────► subscriber listener ────► SubscriberSet
//!   operation N   ──┤  (broadcast chan)    (spawned by builder)
//!   sub workers   ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits.
//! - **Bounded capacity**: one ring buffer for all receivers; laggards skip the oldest items.
//! - **No persistence**: events are dropped when nobody listens (no subscribers configured).

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers; dropped if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

//! # Runtime events emitted by the coordinator.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Run events**: trigger, deadline, completion of one coordinator run
//! - **Operation events**: start/stop/failure of individual operations
//! - **Subscriber events**: overflow and panics of event subscribers
//!
//! The [`Event`] struct carries metadata such as timestamps, operation name and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use graceful::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::OperationFailed)
//!     .with_operation("db")
//!     .with_reason("connection reset")
//!     .with_elapsed(Duration::from_millis(12));
//!
//! assert_eq!(ev.kind, EventKind::OperationFailed);
//! assert_eq!(ev.operation.as_deref(), Some("db"));
//! assert_eq!(ev.elapsed_ms, Some(12));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `operation`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `operation`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Run events ===
    /// Shutdown triggered (token cancelled or OS signal observed).
    ///
    /// Sets:
    /// - `reason`: trigger (`"token"` or signal name)
    /// - `timeout_ms`: configured deadline
    ShutdownRequested,

    /// Deadline reached while operations were still running.
    ///
    /// Sets:
    /// - `timeout_ms`: configured deadline
    /// - `reason`: comma-separated names of pending operations
    DeadlineExceeded,

    /// Every operation returned before the deadline.
    ///
    /// Sets:
    /// - `timeout_ms`: configured deadline
    /// - `elapsed_ms`: time since trigger
    AllStoppedWithin,

    /// A failure could not be queued on the error stream.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `reason`: failure message
    FailureDropped,

    /// Completion signaled; no further failures will be delivered.
    ///
    /// Sets:
    /// - `elapsed_ms`: time since trigger
    /// - `reason`: number of failures, e.g. `"failures=2"`
    RunCompleted,

    // === Operation events ===
    /// Operation task launched.
    ///
    /// Sets:
    /// - `operation`: operation name
    OperationStarting,

    /// Operation returned `Ok(())`.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `elapsed_ms`: run time of the operation
    OperationStopped,

    /// Operation returned an error or panicked.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `reason`: failure message
    /// - `elapsed_ms`: run time of the operation
    OperationFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the operation (or subscriber), if applicable.
    pub operation: Option<Arc<str>>,
    /// Human-readable reason (errors, trigger, pending operations).
    pub reason: Option<Arc<str>>,
    /// Configured run timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Elapsed time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            operation: None,
            reason: None,
            timeout_ms: None,
            elapsed_ms: None,
        }
    }

    /// Attaches an operation name.
    #[inline]
    pub fn with_operation(mut self, name: impl Into<Arc<str>>) -> Self {
        self.operation = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the run timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(compact_ms(d));
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_operation(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_operation(subscriber)
            .with_reason(info)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

//! # LogWriter: events as `tracing` records
//!
//! A subscriber that renders every [`Event`] as a structured `tracing` record under the
//! `graceful` target. Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`)
//! to see them.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO graceful: shutdown requested trigger="SIGTERM" timeout_ms=5000
//! DEBUG graceful: operation starting operation="db"
//! WARN graceful: operation failed operation="db" error="operation failed: reset" elapsed_ms=3
//! WARN graceful: shutdown deadline exceeded timeout_ms=5000 pending="cache"
//! INFO graceful: shutdown complete elapsed_ms=5001 result="failures=1"
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let operation = e.operation.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ShutdownRequested => {
                info!(target: "graceful", trigger = reason, timeout_ms = e.timeout_ms, "shutdown requested");
            }
            EventKind::OperationStarting => {
                debug!(target: "graceful", operation, "operation starting");
            }
            EventKind::OperationStopped => {
                info!(target: "graceful", operation, elapsed_ms = e.elapsed_ms, "operation stopped");
            }
            EventKind::OperationFailed => {
                warn!(target: "graceful", operation, error = reason, elapsed_ms = e.elapsed_ms, "operation failed");
            }
            EventKind::DeadlineExceeded => {
                warn!(target: "graceful", timeout_ms = e.timeout_ms, pending = reason, "shutdown deadline exceeded");
            }
            EventKind::AllStoppedWithin => {
                info!(target: "graceful", timeout_ms = e.timeout_ms, elapsed_ms = e.elapsed_ms, "all operations stopped within deadline");
            }
            EventKind::FailureDropped => {
                error!(target: "graceful", operation, error = reason, "failure dropped, error stream full");
            }
            EventKind::RunCompleted => {
                info!(target: "graceful", elapsed_ms = e.elapsed_ms, result = reason, "shutdown complete");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "graceful", subscriber = operation, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                error!(target: "graceful", subscriber = operation, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

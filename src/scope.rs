//! # Bounded cancellation scope handed to every operation.
//!
//! A [`Scope`] is created by the coordinator at trigger time with a fixed deadline
//! (`trigger time + timeout`). It is cancelled at the earlier of:
//! - the deadline elapsing (then [`Scope::err`] reports [`OperationError::DeadlineExceeded`]);
//! - every operation of the run having returned.
//!
//! The deadline is a signal, not a kill switch: operations observe it through
//! [`Scope::cancelled`], [`Scope::is_cancelled`] or [`Scope::run_until`] and stop cooperatively.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use graceful::{OperationError, Scope};
//!
//! async fn flush(scope: Scope) -> Result<(), OperationError> {
//!     scope
//!         .run_until(tokio::time::sleep(Duration::from_millis(10)))
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::OperationError;

/// Deadline-limited cancellation context for one coordinator run.
///
/// Cheap to clone; all clones observe the same cancellation.
#[derive(Clone, Debug)]
pub struct Scope {
    token: CancellationToken,
    deadline: Instant,
    timeout: Duration,
    expired: Arc<AtomicBool>,
}

impl Scope {
    /// Creates a scope whose deadline is `now + timeout`.
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now() + timeout,
            timeout,
            expired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Instant at which the scope expires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Configured timeout this scope was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time left until the deadline (zero once passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns `true` once the scope has been cancelled for any reason.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns `true` once the deadline has been reached and the scope cancelled because of it.
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }

    /// Completes when the scope is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Reason for cancellation, `None` while the scope is live.
    ///
    /// - [`OperationError::DeadlineExceeded`] when the deadline elapsed;
    /// - [`OperationError::Canceled`] when the run finished first.
    pub fn err(&self) -> Option<OperationError> {
        if !self.token.is_cancelled() {
            return None;
        }
        if self.is_expired() {
            Some(OperationError::DeadlineExceeded)
        } else {
            Some(OperationError::Canceled)
        }
    }

    /// Drives `fut` until it completes or the scope is cancelled, whichever comes first.
    ///
    /// On cancellation `fut` is dropped and [`Scope::err`] is returned.
    pub async fn run_until<F>(&self, fut: F) -> Result<F::Output, OperationError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(self.err().unwrap_or(OperationError::Canceled)),
            out = fut => Ok(out),
        }
    }

    /// Underlying token, for APIs that take a [`CancellationToken`].
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Child token cancelled together with this scope.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Marks the deadline as reached and cancels the scope.
    pub(crate) fn expire(&self) {
        self.expired.store(true, Ordering::Release);
        self.token.cancel();
    }

    /// Cancels the scope after every operation returned.
    pub(crate) fn close(&self) {
        self.token.cancel();
    }
}

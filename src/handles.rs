//! # Output handles of a coordinator run.
//!
//! [`Coordinator::start`](crate::Coordinator::start) returns two read-only handles:
//! - [`Completion`]: single-fire notification that every operation has returned;
//! - [`ErrorStream`]: failures reported by operations, in arrival order.
//!
//! ## Rules
//! - Completion fires **exactly once**, strictly after every operation task returned.
//! - Every failure is queued on the stream **before** completion fires.
//! - After completion the coordinator drops its sender: [`ErrorStream::recv`] yields the
//!   remaining failures, then `None`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, watch};

use crate::error::OperationFailure;

/// Single-fire completion signal. Cloneable; every clone observes the same signal.
#[derive(Clone, Debug)]
pub struct Completion {
    rx: watch::Receiver<bool>,
}

impl Completion {
    pub(crate) fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// Returns `true` once the run is complete.
    pub fn is_done(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the run is complete.
    ///
    /// Also returns if the run was torn down without completing (runtime shutdown).
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|done| *done).await;
    }
}

/// Failures reported during a run.
///
/// Implements [`Stream`] in addition to the inherent receive methods.
#[derive(Debug)]
pub struct ErrorStream {
    rx: mpsc::Receiver<OperationFailure>,
}

impl ErrorStream {
    pub(crate) fn new(rx: mpsc::Receiver<OperationFailure>) -> Self {
        Self { rx }
    }

    /// Receives the next failure; `None` once the run completed and the stream is drained.
    pub async fn recv(&mut self) -> Option<OperationFailure> {
        self.rx.recv().await
    }

    /// Takes a queued failure without waiting.
    pub fn try_recv(&mut self) -> Option<OperationFailure> {
        self.rx.try_recv().ok()
    }

    /// Takes every failure queued right now.
    pub fn drain(&mut self) -> Vec<OperationFailure> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Stream for ErrorStream {
    type Item = OperationFailure;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;
    use futures::StreamExt;
    use std::sync::Arc;

    fn failure(name: &str) -> OperationFailure {
        OperationFailure {
            operation: Arc::from(name),
            error: OperationError::fail("boom"),
        }
    }

    #[tokio::test]
    async fn test_completion_fires_for_all_clones() {
        let (tx, rx) = watch::channel(false);
        let done = Completion::new(rx);
        let other = done.clone();
        assert!(!done.is_done());

        tx.send_replace(true);
        done.wait().await;
        other.wait().await;
        assert!(other.is_done());
    }

    #[tokio::test]
    async fn test_completion_returns_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        let done = Completion::new(rx);
        drop(tx);
        done.wait().await;
        assert!(!done.is_done());
    }

    #[tokio::test]
    async fn test_drain_then_end_of_stream() {
        let (tx, rx) = mpsc::channel(4);
        let mut errors = ErrorStream::new(rx);
        assert!(errors.try_recv().is_none());

        tx.try_send(failure("a")).unwrap();
        tx.try_send(failure("b")).unwrap();
        let drained = errors.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].operation.as_ref(), "a");

        tx.try_send(failure("c")).unwrap();
        drop(tx);
        let rest: Vec<_> = errors.collect().await;
        assert_eq!(rest, vec![failure("c")]);
    }
}

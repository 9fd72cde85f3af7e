//! # Run a single operation of a coordinator run.
//!
//! Invokes one [`Operation`] with the run's [`Scope`], catches panics, and publishes
//! lifecycle events to [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:  publish OperationStarting → op.run(scope) → Ok(())  → publish OperationStopped
//! Failure:  publish OperationStarting → op.run(scope) → Err(e)  → publish OperationFailed
//! Panic:    publish OperationStarting → op.run(scope) → panic   → publish OperationFailed (Panicked)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event: `OperationStopped` or `OperationFailed`
//! - Never applies its own timeout: the scope deadline is cooperative
//! - Returns the operation name with the result so the join loop can match it

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::time::Instant;

use crate::{
    error::OperationError,
    events::{Bus, Event, EventKind},
    operations::OperationRef,
    scope::Scope,
};

/// Result of one operation task: its name and what it returned.
pub(crate) type Outcome = (Arc<str>, Result<(), OperationError>);

/// Runs `op` once with `scope`, publishing lifecycle events to `bus`.
pub(crate) async fn run_operation(
    name: Arc<str>,
    op: OperationRef,
    scope: Scope,
    bus: Bus,
) -> Outcome {
    bus.publish(Event::new(EventKind::OperationStarting).with_operation(Arc::clone(&name)));
    let started = Instant::now();

    // `run` is called inside the guarded future so a panic while building it is caught too.
    let guarded = AssertUnwindSafe(async move { op.run(scope).await }).catch_unwind();
    let res = match guarded.await {
        Ok(res) => res,
        Err(panic) => Err(OperationError::from_panic(&*panic)),
    };

    match &res {
        Ok(()) => bus.publish(
            Event::new(EventKind::OperationStopped)
                .with_operation(Arc::clone(&name))
                .with_elapsed(started.elapsed()),
        ),
        Err(err) => bus.publish(
            Event::new(EventKind::OperationFailed)
                .with_operation(Arc::clone(&name))
                .with_reason(err.to_string())
                .with_elapsed(started.elapsed()),
        ),
    }
    (name, res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationFn;
    use std::time::Duration;

    fn scope() -> Scope {
        Scope::new(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_success_publishes_stopped() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let op: OperationRef = OperationFn::arc(|_s: Scope| async { Ok::<(), OperationError>(()) });

        let (name, res) = run_operation(Arc::from("http"), op, scope(), bus).await;
        assert_eq!(name.as_ref(), "http");
        assert_eq!(res, Ok(()));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::OperationStarting);
        let stopped = rx.recv().await.unwrap();
        assert_eq!(stopped.kind, EventKind::OperationStopped);
        assert_eq!(stopped.operation.as_deref(), Some("http"));
        assert!(stopped.elapsed_ms.is_some());
    }

    #[tokio::test]
    async fn test_failure_publishes_failed() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let op: OperationRef =
            OperationFn::arc(|_s: Scope| async { Err::<(), _>(OperationError::fail("flush failed")) });

        let (_, res) = run_operation(Arc::from("db"), op, scope(), bus).await;
        assert_eq!(res, Err(OperationError::fail("flush failed")));

        let _starting = rx.recv().await.unwrap();
        let failed = rx.recv().await.unwrap();
        assert_eq!(failed.kind, EventKind::OperationFailed);
        assert_eq!(failed.reason.as_deref(), Some("operation failed: flush failed"));
    }

    #[tokio::test]
    async fn test_panic_becomes_error() {
        let bus = Bus::new(8);
        let op: OperationRef = OperationFn::arc(|_s: Scope| async {
            if true {
                panic!("cleanup exploded");
            }
            Ok::<(), OperationError>(())
        });

        let (_, res) = run_operation(Arc::from("cache"), op, scope(), bus).await;
        assert_eq!(
            res,
            Err(OperationError::Panicked {
                info: "cleanup exploded".into()
            })
        );
    }
}

//! # Coordinator: trigger race, operation fan-out, and completion.
//!
//! The [`Coordinator`] owns the event bus and configuration. Each call to
//! [`Coordinator::start`] launches one independent run in a background task and returns
//! its [`Completion`] and [`ErrorStream`] immediately.
//!
//! ## Run lifecycle
//! ```text
//! start(token, operations)
//!   ├─► SignalListener::install(cfg.signals)        (synchronous, before returning)
//!   └─► spawn run:
//!
//!   Idle ──► wait_for_trigger(token, listener) ──┬─► Trigger::Token
//!    │                                           └─► Trigger::Signal(sig)
//!    ▼
//!   Triggered ──► drop(listener) ──► publish ShutdownRequested
//!              ──► Scope::new(cfg.timeout)          (deadline = trigger + timeout)
//!    ▼
//!   Running(N) ─► JoinSet.spawn(run_operation(name, op, scope)) × N
//!                 loop:
//!                   ├─ join_next ─► Err(e) ─► try_send OperationFailure
//!                   └─ deadline  ─► scope.expire(), publish DeadlineExceeded
//!    ▼
//!   Complete ───► scope.close() ─► completion = true ─► drop error sender
//!                 publish RunCompleted
//! ```
//!
//! ## Rules
//! - Operations are never aborted; the deadline only cancels the scope they receive.
//! - Completion fires exactly once, after every operation task returned.
//! - The error stream has room for one failure per operation, so delivery never waits.
//! - Once triggered, a run always executes, whether or not anyone holds its handles.
//! - One run per signal set at a time; sequential runs are fine.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::core::builder::CoordinatorBuilder;
use crate::core::runner::{self, Outcome};
use crate::core::signals::SignalListener;
use crate::core::trigger;
use crate::{
    config::Config,
    error::{CoordinatorError, OperationFailure},
    events::{Bus, Event, EventKind},
    handles::{Completion, ErrorStream},
    operations::Operations,
    scope::Scope,
    subscribers::SubscriberSet,
};

/// Graceful-shutdown coordinator.
///
/// ## Example
/// ```rust,no_run
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use graceful::{Config, Coordinator, OperationError, Operations, Scope, Signal};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cfg = Config::default()
///         .with_timeout(Duration::from_secs(5))
///         .with_signals([Signal::Terminate, Signal::Interrupt]);
///     let coordinator = Coordinator::builder(cfg).build();
///
///     let ops = Operations::new().with("http", |scope: Scope| async move {
///         scope.run_until(tokio::time::sleep(Duration::from_millis(50))).await?;
///         Ok::<(), OperationError>(())
///     });
///
///     let token = CancellationToken::new();
///     let (done, mut errors) = coordinator.start(token, ops)?;
///
///     done.wait().await;
///     while let Some(failure) = errors.recv().await {
///         eprintln!("{failure}");
///     }
///     Ok(())
/// }
/// ```
pub struct Coordinator {
    cfg: Config,
    bus: Bus,
    /// Cancels the subscriber listener once the coordinator and all its runs are gone.
    listener_guard: Arc<DropGuard>,
}

impl Coordinator {
    /// Returns a builder for a coordinator with the given configuration.
    pub fn builder(cfg: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(cfg)
    }

    /// Assembles a coordinator; spawns the subscriber listener if `subs` is present.
    pub(crate) fn new_internal(cfg: Config, bus: Bus, subs: Option<SubscriberSet>) -> Self {
        let listener_token = CancellationToken::new();
        if let Some(subs) = subs {
            subscriber_listener(bus.subscribe(), subs, listener_token.clone());
        }
        Self {
            cfg,
            bus,
            listener_guard: Arc::new(listener_token.drop_guard()),
        }
    }

    /// Configuration shared by every run.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Starts one run and returns its handles without blocking.
    ///
    /// The configured signals are listened to before this returns. The run waits for
    /// `token` to be cancelled or one of those signals, then invokes every operation
    /// exactly once with a shared [`Scope`].
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// [`CoordinatorError`] if a signal listener cannot be installed.
    pub fn start(
        &self,
        token: CancellationToken,
        operations: Operations,
    ) -> Result<(Completion, ErrorStream), CoordinatorError> {
        let listener = SignalListener::install(&self.cfg.signals)?;

        let (done_tx, done_rx) = watch::channel(false);
        let (err_tx, err_rx) = mpsc::channel(operations.len().max(1));

        let run = Run {
            bus: self.bus.clone(),
            timeout: self.cfg.timeout,
            _listener_guard: Arc::clone(&self.listener_guard),
        };
        tokio::spawn(run.drive(token, listener, operations, done_tx, err_tx));

        Ok((Completion::new(done_rx), ErrorStream::new(err_rx)))
    }
}

/// Starts a run with default settings, `timeout` and `signals`, and no subscribers.
///
/// Shorthand for `Coordinator::builder(cfg).build().start(token, operations)`.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use graceful::{OperationError, Operations, Scope};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), graceful::CoordinatorError> {
///     let token = CancellationToken::new();
///     let ops = Operations::new().with("flush", |_scope: Scope| async {
///         Ok::<(), OperationError>(())
///     });
///
///     let (done, mut errors) = graceful::shutdown(token.clone(), Duration::from_secs(1), ops, [])?;
///     token.cancel();
///
///     done.wait().await;
///     assert!(errors.try_recv().is_none());
///     Ok(())
/// }
/// ```
pub fn shutdown(
    token: CancellationToken,
    timeout: Duration,
    operations: Operations,
    signals: impl IntoIterator<Item = crate::signal::Signal>,
) -> Result<(Completion, ErrorStream), CoordinatorError> {
    let cfg = Config::default()
        .with_timeout(timeout)
        .with_signals(signals);
    Coordinator::builder(cfg).build().start(token, operations)
}

/// Forwards bus events to the subscriber set until cancelled and drained.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    subs: SubscriberSet,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                ev = rx.recv() => match ev {
                    Ok(ev) => subs.emit(Arc::new(ev)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = token.cancelled() => break,
            }
        }
    });
}

/// State moved into the background task of one run.
struct Run {
    bus: Bus,
    timeout: Duration,
    _listener_guard: Arc<DropGuard>,
}

impl Run {
    async fn drive(
        self,
        token: CancellationToken,
        mut listener: SignalListener,
        operations: Operations,
        done_tx: watch::Sender<bool>,
        err_tx: mpsc::Sender<OperationFailure>,
    ) {
        let trigger = trigger::wait_for_trigger(&token, &mut listener).await;
        drop(listener);

        self.bus.publish(
            Event::new(EventKind::ShutdownRequested)
                .with_reason(trigger.to_string())
                .with_timeout(self.timeout),
        );

        let triggered = Instant::now();
        let scope = Scope::new(self.timeout);
        let mut pending: BTreeSet<Arc<str>> = operations.names().map(Arc::from).collect();
        if self.timeout.is_zero() {
            self.expire(&scope, &pending);
        }

        let mut set = JoinSet::new();
        for (name, op) in operations {
            set.spawn(runner::run_operation(name, op, scope.clone(), self.bus.clone()));
        }

        let failures = self
            .join_all(&mut set, &scope, &mut pending, &err_tx, triggered)
            .await;

        scope.close();
        done_tx.send_replace(true);
        drop(err_tx);

        self.bus.publish(
            Event::new(EventKind::RunCompleted)
                .with_elapsed(triggered.elapsed())
                .with_reason(format!("failures={failures}")),
        );
    }

    /// Collects every operation result, expiring the scope at its deadline.
    ///
    /// Returns the number of failures reported.
    async fn join_all(
        &self,
        set: &mut JoinSet<Outcome>,
        scope: &Scope,
        pending: &mut BTreeSet<Arc<str>>,
        err_tx: &mpsc::Sender<OperationFailure>,
        triggered: Instant,
    ) -> usize {
        let deadline = tokio::time::sleep_until(scope.deadline());
        tokio::pin!(deadline);

        let mut failures = 0;
        while !set.is_empty() {
            tokio::select! {
                biased;
                joined = set.join_next() => match joined {
                    Some(Ok((name, res))) => {
                        pending.remove(&name);
                        if let Err(error) = res {
                            failures += 1;
                            self.deliver(err_tx, OperationFailure { operation: name, error });
                        }
                    }
                    // Only reachable when the runtime is shutting down; panics are caught in the runner.
                    Some(Err(_)) => {}
                    None => break,
                },
                _ = &mut deadline, if !scope.is_expired() => {
                    self.expire(scope, pending);
                }
            }
        }

        if !scope.is_expired() {
            self.bus.publish(
                Event::new(EventKind::AllStoppedWithin)
                    .with_timeout(self.timeout)
                    .with_elapsed(triggered.elapsed()),
            );
        }
        failures
    }

    /// Queues a failure without waiting; capacity covers one failure per operation.
    fn deliver(&self, err_tx: &mpsc::Sender<OperationFailure>, failure: OperationFailure) {
        match err_tx.try_send(failure) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(failure)) => self.bus.publish(
                Event::new(EventKind::FailureDropped)
                    .with_operation(Arc::clone(&failure.operation))
                    .with_reason(failure.error.to_string()),
            ),
            // Caller dropped the stream; nothing left to deliver to.
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    fn expire(&self, scope: &Scope, pending: &BTreeSet<Arc<str>>) {
        scope.expire();
        let names: Vec<&str> = pending.iter().map(|n| n.as_ref()).collect();
        self.bus.publish(
            Event::new(EventKind::DeadlineExceeded)
                .with_timeout(self.timeout)
                .with_reason(names.join(",")),
        );
    }
}

//! # graceful
//!
//! **graceful** is a graceful-shutdown coordinator for Tokio applications.
//!
//! Hand it a set of named cleanup operations; it waits for a shutdown trigger (a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) being cancelled or an OS
//! signal arriving), runs every operation concurrently under one shared deadline, and
//! reports failures without blocking the caller.
//!
//! ## Architecture
//! ```text
//!   Operations { "http" → op, "db" → op, "cache" → op }
//!                           │
//!                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Coordinator::start(token, operations)  (returns immediately)     │
//! │  - SignalListener installed before returning                      │
//! │  - spawns one background run                                      │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!            token.cancelled()  ◄─ race ─►  signal.recv()
//!                                ▼
//!                 Scope { deadline = trigger + timeout }
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!     op("http")(scope)     op("db")(scope)      op("cache")(scope)
//!          │                     │                     │
//!          └──────── JoinSet (wait for all N) ─────────┘
//!                                ▼
//!     ErrorStream ◄── one OperationFailure per failed op (try_send)
//!     Completion  ◄── fired once, after every op returned
//! ```
//!
//! Diagnostics flow as [`Event`]s to the [`Subscribe`] implementations given to
//! [`CoordinatorBuilder::with_subscribers`]; with none configured the coordinator is silent.
//!
//! ## Features
//! | Area              | Description                                                   | Key types                                   |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Coordination**  | Trigger race, fan-out, shared deadline, completion.           | [`Coordinator`], [`shutdown`]               |
//! | **Operations**    | Cleanup steps as closures or trait objects.                   | [`Operation`], [`OperationFn`], [`Operations`] |
//! | **Scope**         | Deadline-bound cancellation handed to each operation.         | [`Scope`]                                   |
//! | **Results**       | Single-fire completion and non-blocking error stream.         | [`Completion`], [`ErrorStream`]             |
//! | **Errors**        | Typed failures with a comparable deadline sentinel.           | [`OperationError`], [`CoordinatorError`]    |
//! | **Observability** | Event subscribers with isolated queues.                       | [`Subscribe`], [`Event`]                    |
//! | **Configuration** | Timeout, trigger signals, bus capacity.                       | [`Config`], [`Signal`]                      |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that writes events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use graceful::{Config, Coordinator, OperationError, Operations, Scope};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = Coordinator::builder(
//!         Config::default().with_timeout(Duration::from_millis(100)),
//!     )
//!     .build();
//!
//!     let ops = Operations::new()
//!         .with("flush", |_scope: Scope| async { Ok::<(), OperationError>(()) })
//!         .with("drain", |scope: Scope| async move {
//!             // Respect the deadline instead of sleeping the full five seconds.
//!             scope.run_until(tokio::time::sleep(Duration::from_secs(5))).await?;
//!             Ok::<(), OperationError>(())
//!         });
//!
//!     let token = CancellationToken::new();
//!     let (done, mut errors) = coordinator.start(token.clone(), ops)?;
//!     token.cancel();
//!
//!     done.wait().await;
//!     let failures = errors.drain();
//!     assert_eq!(failures.len(), 1);
//!     assert_eq!(failures[0].operation.as_ref(), "drain");
//!     assert_eq!(failures[0].error, OperationError::DeadlineExceeded);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod handles;
mod operations;
mod scope;
mod signal;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use self::core::{shutdown, Coordinator, CoordinatorBuilder};
pub use error::{CoordinatorError, OperationError, OperationFailure};
pub use events::{Event, EventKind};
pub use handles::{Completion, ErrorStream};
pub use operations::{BoxOperationFuture, Operation, OperationFn, OperationRef, Operations};
pub use scope::Scope;
pub use signal::Signal;
pub use subscribers::Subscribe;

// Optional: built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

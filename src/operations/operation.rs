//! # Operation abstraction.
//!
//! An [`Operation`] is one cleanup step. The coordinator calls [`Operation::run`] exactly
//! once per run with the run's [`Scope`] and awaits the returned future in its own task.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::OperationError;
use crate::scope::Scope;

/// Boxed future produced by [`Operation::run`].
pub type BoxOperationFuture = Pin<Box<dyn Future<Output = Result<(), OperationError>> + Send + 'static>>;

/// Shared handle to an operation.
pub type OperationRef = Arc<dyn Operation>;

/// # Asynchronous cleanup unit.
///
/// Implementors should watch the scope and return [`OperationError::DeadlineExceeded`]
/// (see [`Scope::err`]) once its deadline elapses. The coordinator never aborts a running
/// operation; an operation that ignores the scope delays completion.
///
/// # Example
/// ```
/// use graceful::{BoxOperationFuture, Operation, OperationError, Scope};
///
/// struct CloseListener;
///
/// impl Operation for CloseListener {
///     fn run(&self, scope: Scope) -> BoxOperationFuture {
///         Box::pin(async move {
///             if let Some(err) = scope.err() {
///                 return Err(err);
///             }
///             // close sockets...
///             Ok::<(), OperationError>(())
///         })
///     }
/// }
/// ```
pub trait Operation: Send + Sync + 'static {
    /// Creates the future that performs the cleanup within `scope`.
    fn run(&self, scope: Scope) -> BoxOperationFuture;
}

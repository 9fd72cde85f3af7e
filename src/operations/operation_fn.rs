//! # Function-backed operation (`OperationFn`)
//!
//! [`OperationFn`] wraps a closure `F: Fn(Scope) -> Fut`, producing a fresh future per run.
//! State shared between runs must be captured explicitly (e.g. `Arc<...>`).
//!
//! ## Example
//! ```rust
//! use graceful::{OperationError, OperationFn, OperationRef, Scope};
//!
//! let op: OperationRef = OperationFn::arc(|scope: Scope| async move {
//!     if scope.is_cancelled() {
//!         return Err(OperationError::Canceled);
//!     }
//!     Ok(())
//! });
//! # let _ = op;
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::OperationError;
use crate::operations::operation::{BoxOperationFuture, Operation};
use crate::scope::Scope;

/// Function-backed operation implementation.
pub struct OperationFn<F> {
    f: F,
}

impl<F> OperationFn<F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OperationFn::arc`] when you immediately need an [`OperationRef`](crate::OperationRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Operation for OperationFn<F>
where
    F: Fn(Scope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), OperationError>> + Send + 'static,
{
    fn run(&self, scope: Scope) -> BoxOperationFuture {
        Box::pin((self.f)(scope))
    }
}

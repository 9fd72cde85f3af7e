//! # Operation abstractions.
//!
//! This module provides the operation-related types:
//! - [`Operation`] - trait for async cleanup steps that receive a [`Scope`](crate::Scope)
//! - [`OperationFn`] - closure-backed implementation
//! - [`OperationRef`] - shared reference to an operation (`Arc<dyn Operation>`)
//! - [`Operations`] - name → operation mapping handed to the coordinator

mod operation;
mod operation_fn;
mod set;

pub use operation::{BoxOperationFuture, Operation, OperationRef};
pub use operation_fn::OperationFn;
pub use set::Operations;

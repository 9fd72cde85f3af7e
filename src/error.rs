//! Error types used by the shutdown coordinator and its operations.
//!
//! This module defines three types:
//!
//! - [`OperationError`]: what a single cleanup operation returns when it fails.
//! - [`OperationFailure`]: an [`OperationError`] tagged with the operation name; this is
//!   the item type of the [`ErrorStream`](crate::ErrorStream).
//! - [`CoordinatorError`]: misuse detected at call time (signal listener cannot be installed).
//!
//! Each enum provides `as_label` for logs/metrics.

use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;

use crate::signal::Signal;

/// # Errors returned by cleanup operations.
///
/// [`OperationError::DeadlineExceeded`] is the sentinel an operation returns once its
/// [`Scope`](crate::Scope) deadline elapsed; compare it with `==` or `matches!`.
///
/// # Example
/// ```
/// use graceful::OperationError;
///
/// let err = OperationError::fail("connection reset");
/// assert_eq!(err, OperationError::Fail { error: "connection reset".into() });
/// assert_eq!(err.as_label(), "operation_failed");
/// assert!(OperationError::DeadlineExceeded.is_deadline_exceeded());
/// ```
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The shutdown deadline elapsed before the operation finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The scope was cancelled before its deadline.
    #[error("scope cancelled")]
    Canceled,

    /// The operation failed.
    #[error("operation failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The operation panicked; the panic was caught by the coordinator.
    #[error("operation panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl OperationError {
    /// Builds [`OperationError::Fail`] from anything printable.
    pub fn fail(error: impl Display) -> Self {
        OperationError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns `true` for [`OperationError::DeadlineExceeded`].
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, OperationError::DeadlineExceeded)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OperationError::DeadlineExceeded => "deadline_exceeded",
            OperationError::Canceled => "operation_canceled",
            OperationError::Fail { .. } => "operation_failed",
            OperationError::Panicked { .. } => "operation_panicked",
        }
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        OperationError::Panicked {
            info: panic_info(payload),
        }
    }
}

impl From<std::io::Error> for OperationError {
    fn from(err: std::io::Error) -> Self {
        OperationError::fail(err)
    }
}

/// A failed operation as delivered on the [`ErrorStream`](crate::ErrorStream).
///
/// `operation` is the name the operation was registered under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation {operation:?}: {error}")]
pub struct OperationFailure {
    /// Registered operation name.
    pub operation: Arc<str>,
    /// What the operation returned.
    #[source]
    pub error: OperationError,
}

/// # Errors raised when starting a coordinator run.
///
/// These are caller programming errors and surface synchronously from
/// [`Coordinator::start`](crate::Coordinator::start), never through the error stream.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// The OS refused to install a listener for the signal (e.g. `SIGKILL`).
    #[error("failed to listen for {signal}: {source}")]
    SignalInstall {
        /// Requested signal.
        signal: Signal,
        /// Registration error from the runtime.
        source: std::io::Error,
    },

    /// The signal cannot be observed on this platform.
    #[error("{signal} is not supported on this platform")]
    UnsupportedSignal {
        /// Requested signal.
        signal: Signal,
    },
}

impl CoordinatorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinatorError::SignalInstall { .. } => "signal_install_failed",
            CoordinatorError::UnsupportedSignal { .. } => "signal_unsupported",
        }
    }
}

/// Renders a panic payload captured by `catch_unwind`.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

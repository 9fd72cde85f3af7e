//! # Trigger race.
//!
//! The run waits for the first of:
//! - the caller's token reaching its cancelled state;
//! - one of the installed signals being delivered.
//!
//! The losing path is disregarded for the rest of the run.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::core::signals::SignalListener;
use crate::signal::Signal;

/// What started the shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    /// The caller's token was cancelled.
    Token,
    /// An installed OS signal arrived.
    Signal(Signal),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Token => f.write_str("token"),
            Trigger::Signal(signal) => fmt::Display::fmt(signal, f),
        }
    }
}

/// Waits for the token or a signal, whichever fires first.
///
/// An already-cancelled token wins over pending signals.
pub(crate) async fn wait_for_trigger(
    token: &CancellationToken,
    listener: &mut SignalListener,
) -> Trigger {
    tokio::select! {
        biased;
        _ = token.cancelled() => Trigger::Token,
        signal = listener.recv() => Trigger::Signal(signal),
    }
}

//! # Portable OS signal identifiers.
//!
//! [`Signal`] names the process signals a coordinator run may treat as a shutdown trigger.
//!
//! ## Platforms
//! **Unix:** every variant maps to a [`tokio::signal::unix::SignalKind`].
//!
//! **Windows:** only [`Signal::Interrupt`] (Ctrl-C) can be observed.

use std::fmt;

/// OS signal that triggers shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` (Ctrl-C in a terminal).
    Interrupt,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP`.
    Hangup,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
    /// Any other signal by its raw number (Unix only).
    Raw(i32),
}

impl Signal {
    /// Returns the conventional signal name, e.g. `"SIGTERM"`.
    ///
    /// [`Signal::Raw`] has no fixed name and returns `"SIGRAW"`; its
    /// [`Display`](fmt::Display) form carries the number.
    pub fn as_label(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Hangup => "SIGHUP",
            Signal::User1 => "SIGUSR1",
            Signal::User2 => "SIGUSR2",
            Signal::Raw(_) => "SIGRAW",
        }
    }

    #[cfg(unix)]
    pub(crate) fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Quit => SignalKind::quit(),
            Signal::Hangup => SignalKind::hangup(),
            Signal::User1 => SignalKind::user_defined1(),
            Signal::User2 => SignalKind::user_defined2(),
            Signal::Raw(n) => SignalKind::from_raw(n),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Raw(n) => write!(f, "signal {n}"),
            other => f.write_str(other.as_label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
        assert_eq!(Signal::Raw(34).to_string(), "signal 34");
    }

    #[cfg(unix)]
    #[test]
    fn test_kind_maps_to_raw_numbers() {
        assert_eq!(Signal::Interrupt.kind().as_raw_value(), 2);
        assert_eq!(Signal::Terminate.kind().as_raw_value(), 15);
        assert_eq!(Signal::Raw(34).kind().as_raw_value(), 34);
    }
}

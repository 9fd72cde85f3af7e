//! # Coordinator configuration.
//!
//! Provides [`Config`], the settings shared by every run of a [`Coordinator`](crate::Coordinator).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no grace period: the scope is already expired when operations start
//! - `signals = []` → only token cancellation triggers shutdown
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::signal::Signal;

/// Configuration for the shutdown coordinator.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use graceful::{Config, Signal};
///
/// let cfg = Config::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_signals([Signal::Terminate, Signal::Interrupt]);
///
/// assert_eq!(cfg.timeout, Duration::from_secs(10));
/// assert_eq!(cfg.signals.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Deadline for all operations, measured from the trigger.
    pub timeout: Duration,

    /// OS signals that trigger shutdown in addition to the token.
    ///
    /// Duplicates are ignored.
    pub signals: Vec<Signal>,

    /// Capacity of the event bus ring buffer.
    ///
    /// Subscribers lagging more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,
}

impl Config {
    /// Sets the shutdown deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the trigger signals.
    pub fn with_signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    /// Uses the conventional termination signals of the platform.
    ///
    /// - Unix: `SIGINT`, `SIGTERM`, `SIGQUIT`
    /// - Windows: Ctrl-C
    pub fn with_default_signals(self) -> Self {
        self.with_signals(default_signals())
    }

    /// Sets the event bus capacity.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 30s`
    /// - `signals = []` (token only)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            signals: Vec::new(),
            bus_capacity: 1024,
        }
    }
}

#[cfg(unix)]
fn default_signals() -> Vec<Signal> {
    vec![Signal::Interrupt, Signal::Terminate, Signal::Quit]
}

#[cfg(not(unix))]
fn default_signals() -> Vec<Signal> {
    vec![Signal::Interrupt]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.signals.is_empty());
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config::default().with_bus_capacity(0);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_default_signals_include_interrupt() {
        let cfg = Config::default().with_default_signals();
        assert!(cfg.signals.contains(&Signal::Interrupt));
    }
}

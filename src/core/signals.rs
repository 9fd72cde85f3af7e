//! # Scoped OS signal subscription.
//!
//! [`SignalListener`] owns the signal streams of one coordinator run. It is installed
//! synchronously in [`Coordinator::start`](crate::Coordinator::start), so a signal
//! delivered after `start` returns is never missed, and it releases every stream when
//! dropped right after the trigger fires.
//!
//! ## Platforms
//! **Unix:** any [`Signal`] via [`tokio::signal::unix::signal`].
//!
//! **Windows:** [`Signal::Interrupt`] only, via [`tokio::signal::windows::ctrl_c`].

use crate::error::CoordinatorError;
use crate::signal::Signal;

#[cfg(unix)]
type SignalStream = tokio::signal::unix::Signal;

#[cfg(windows)]
type SignalStream = tokio::signal::windows::CtrlC;

#[cfg(not(any(unix, windows)))]
type SignalStream = Unsupported;

/// Signal streams held for the duration of one run.
pub(crate) struct SignalListener {
    streams: Vec<(Signal, SignalStream)>,
}

impl SignalListener {
    /// Installs listeners for `signals` (duplicates ignored).
    ///
    /// Must be called from within a Tokio runtime when `signals` is non-empty.
    pub(crate) fn install(signals: &[Signal]) -> Result<Self, CoordinatorError> {
        let mut streams: Vec<(Signal, SignalStream)> = Vec::with_capacity(signals.len());
        for &signal in signals {
            if streams.iter().any(|(s, _)| *s == signal) {
                continue;
            }
            streams.push((signal, listen(signal)?));
        }
        Ok(Self { streams })
    }

    /// Signals currently listened to.
    #[cfg(test)]
    pub(crate) fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.streams.iter().map(|(s, _)| *s)
    }

    /// Waits for the first of the installed signals; pends forever if none are installed.
    pub(crate) async fn recv(&mut self) -> Signal {
        if self.streams.is_empty() {
            return std::future::pending().await;
        }

        let waits = self.streams.iter_mut().map(|(signal, stream)| {
            Box::pin(async move {
                match stream.recv().await {
                    Some(()) => *signal,
                    None => std::future::pending().await,
                }
            })
        });
        let (signal, _, _) = futures::future::select_all(waits).await;
        signal
    }
}

#[cfg(unix)]
fn listen(signal: Signal) -> Result<SignalStream, CoordinatorError> {
    tokio::signal::unix::signal(signal.kind())
        .map_err(|source| CoordinatorError::SignalInstall { signal, source })
}

#[cfg(windows)]
fn listen(signal: Signal) -> Result<SignalStream, CoordinatorError> {
    match signal {
        Signal::Interrupt => tokio::signal::windows::ctrl_c()
            .map_err(|source| CoordinatorError::SignalInstall { signal, source }),
        other => Err(CoordinatorError::UnsupportedSignal { signal: other }),
    }
}

#[cfg(not(any(unix, windows)))]
fn listen(signal: Signal) -> Result<SignalStream, CoordinatorError> {
    Err(CoordinatorError::UnsupportedSignal { signal })
}

#[cfg(not(any(unix, windows)))]
pub(crate) enum Unsupported {}

#[cfg(not(any(unix, windows)))]
impl Unsupported {
    async fn recv(&mut self) -> Option<()> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_listener_never_fires() {
        let mut listener = SignalListener::install(&[]).expect("no signals");
        assert_eq!(listener.signals().count(), 0);
        let fired = tokio::time::timeout(std::time::Duration::from_millis(20), listener.recv()).await;
        assert!(fired.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_duplicates_are_ignored() {
        let listener =
            SignalListener::install(&[Signal::Hangup, Signal::Hangup]).expect("SIGHUP installs");
        assert_eq!(listener.signals().collect::<Vec<_>>(), vec![Signal::Hangup]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_forbidden_signal_is_rejected() {
        // SIGKILL cannot be caught.
        let err = SignalListener::install(&[Signal::Raw(9)])
            .err()
            .expect("SIGKILL must be rejected");
        assert!(matches!(
            err,
            CoordinatorError::SignalInstall {
                signal: Signal::Raw(9),
                ..
            }
        ));
    }
}

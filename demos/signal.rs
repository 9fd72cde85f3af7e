//! # Signal Example
//!
//! Waits for SIGUSR1 (or Ctrl+C) without any cancellation token involved, then runs a
//! single cleanup step. The process sends SIGUSR1 to itself after one second.
//!
//! The token passed to the coordinator is never cancelled; the signal alone triggers the run.
//!
//! ## Run
//! ```bash
//! cargo run --example signal
//! ```

use std::time::Duration;

use graceful::{OperationError, Operations, Scope, Signal};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ops = Operations::new().with("goodbye", |scope: Scope| async move {
        println!("cleanup started, {:?} left", scope.remaining());
        Ok::<(), OperationError>(())
    });

    let signals = if cfg!(unix) {
        vec![Signal::User1, Signal::Interrupt]
    } else {
        vec![Signal::Interrupt]
    };
    let (done, mut errors) = graceful::shutdown(
        CancellationToken::new(),
        Duration::from_secs(3),
        ops,
        signals,
    )?;

    #[cfg(unix)]
    tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        println!("sending SIGUSR1 to self");
        if let Err(e) = nix::sys::signal::kill(
            nix::unistd::Pid::this(),
            nix::sys::signal::Signal::SIGUSR1,
        ) {
            eprintln!("kill failed: {e}");
        }
    });

    done.wait().await;
    while let Some(failure) = errors.recv().await {
        eprintln!("{failure}");
    }
    println!("done");
    Ok(())
}

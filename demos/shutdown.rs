//! # Shutdown Example
//!
//! Simulates a service with three cleanup steps and a shutdown budget of one second:
//! - `http` stops accepting and drains in-flight requests
//! - `db` flushes a write buffer and fails
//! - `cache` ignores the deadline at first and gets cut off by it
//!
//! Events are rendered by [`graceful::LogWriter`] through `tracing`.
//!
//! The run is triggered by SIGINT/SIGTERM (Ctrl+C) or, if nothing arrives, by the
//! application itself after two seconds.
//!
//! ## Run
//! ```bash
//! RUST_LOG=graceful=debug cargo run --example shutdown --features logging
//! ```

use std::{sync::Arc, time::Duration};

use graceful::{Config, Coordinator, LogWriter, OperationError, Operations, Scope};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

async fn drain_http(scope: Scope) -> Result<(), OperationError> {
    for batch in 1..=3 {
        scope
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await?;
        println!("[http] drained batch {batch}");
    }
    Ok(())
}

async fn flush_db(_scope: Scope) -> Result<(), OperationError> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    Err(OperationError::fail("write buffer rejected: disk full"))
}

async fn persist_cache(scope: Scope) -> Result<(), OperationError> {
    scope
        .run_until(tokio::time::sleep(Duration::from_secs(10)))
        .await?;
    println!("[cache] persisted");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("graceful=info")),
        )
        .init();

    let cfg = Config::default()
        .with_timeout(Duration::from_secs(1))
        .with_default_signals();
    let coordinator = Coordinator::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    let ops = Operations::new()
        .with("http", drain_http)
        .with("db", flush_db)
        .with("cache", persist_cache);

    let token = CancellationToken::new();
    let (done, mut errors) = coordinator.start(token.clone(), ops)?;
    println!("running; press Ctrl+C or wait two seconds");

    tokio::select! {
        _ = done.wait() => {}
        _ = tokio::time::sleep(Duration::from_secs(2)) => token.cancel(),
    }
    done.wait().await;

    let failures = errors.drain();
    println!();
    println!("Shutdown finished with {} failure(s):", failures.len());
    for failure in &failures {
        println!(" └─► {failure}");
    }
    Ok(())
}

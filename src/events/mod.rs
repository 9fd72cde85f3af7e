//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the coordinator run task, `core::runner::run_operation`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: the subscriber listener spawned by `CoordinatorBuilder::build`,
//!   which fans out to the `SubscriberSet`.

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{Event, EventKind};

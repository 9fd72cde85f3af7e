//! # Event subscribers.
//!
//! Subscribers are the injectable diagnostics sink of the coordinator.
//!
//! ```text
//! run task / operations ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                    │
//!                                                        ┌───────────┼───────────┐
//!                                                        ▼           ▼           ▼
//!                                                    LogWriter    Metrics     Custom
//! ```
//!
//! - [`Subscribe`]: trait to implement
//! - `LogWriter`: built-in `tracing` renderer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::SubscriberSet;
pub use subscribe::Subscribe;

//! Runtime core: trigger detection, fan-out and completion.
//!
//! The public API from this module is [`Coordinator`], its [`CoordinatorBuilder`] and the
//! [`shutdown`] shorthand.
//!
//! Internal modules:
//! - [`coordinator`]: owns the bus, starts runs, drives one run from trigger to completion;
//! - [`builder`]: assembles a coordinator with its subscribers;
//! - [`runner`]: invokes one operation, catches panics, publishes lifecycle events;
//! - [`signals`]: scoped OS signal subscription;
//! - [`trigger`]: race between token cancellation and signals.

mod builder;
mod coordinator;
mod runner;
mod signals;
mod trigger;

pub use builder::CoordinatorBuilder;
pub use coordinator::{shutdown, Coordinator};

use std::sync::Arc;

use crate::{
    config::Config,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

use super::coordinator::Coordinator;

/// Builder for constructing a [`Coordinator`] with optional subscribers.
pub struct CoordinatorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl CoordinatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive run events (trigger, operation lifecycle, deadline)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the coordinator.
    ///
    /// With subscribers configured this spawns their workers and must run inside a
    /// Tokio runtime; without subscribers nothing is spawned.
    pub fn build(self) -> Coordinator {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = if self.subscribers.is_empty() {
            None
        } else {
            Some(SubscriberSet::new(self.subscribers, bus.clone()))
        };
        Coordinator::new_internal(self.cfg, bus, subs)
    }
}

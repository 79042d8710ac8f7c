use crate::application::runtime::{EventQueue, QueueError};
use crate::application::{InboundEvent, Outbound, Router};
use std::time::Instant;

/// Default number of events handled per poll
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Batching driver around the [`Router`]
///
/// Transports submit events from wherever they arrive; the host calls
/// [`poll`](Self::poll) from a single task so events are applied one at a
/// time, in submission order.
pub struct SessionLoop {
    router: Router,
    inbound: EventQueue,

    /// Commands not yet handed to the transport
    outbound: Vec<Outbound>,
    batch_size: usize,
}

impl SessionLoop {
    pub fn new(router: Router, batch_size: usize, max_queue_size: usize) -> Self {
        Self {
            router,
            inbound: EventQueue::new(max_queue_size),
            outbound: Vec::new(),
            batch_size,
        }
    }

    /// Queue an event; a full queue returns it inside the error
    pub fn submit(&mut self, event: InboundEvent) -> Result<(), QueueError> {
        self.inbound.push(event)
    }

    /// Route at most one batch of queued events, returning how many ran
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;

        for event in self.inbound.drain(self.batch_size) {
            self.outbound.extend(self.router.handle(event));
            processed += 1;
        }

        processed
    }

    /// Run time-based checks (readiness deadline)
    pub fn tick(&mut self, now: Instant) {
        let out = self.router.expire_round(now);
        self.outbound.extend(out);
    }

    pub fn drain_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbound)
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

use crate::application::InboundEvent;
use std::collections::VecDeque;

pub const DEFAULT_QUEUE_SIZE: usize = 256;

/// Bounded FIFO between the transport side and the router
///
/// A rejected push hands the event back inside the error, so the caller can
/// make room and resubmit it.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<InboundEvent>,
    bound: usize,
}

impl EventQueue {
    pub fn new(bound: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(bound),
            bound,
        }
    }

    pub fn push(&mut self, event: InboundEvent) -> Result<(), QueueError> {
        if self.events.len() >= self.bound {
            return Err(QueueError::Full {
                max: self.bound,
                event: Box::new(event),
            });
        }
        self.events.push_back(event);
        Ok(())
    }

    /// Oldest `limit` events, front first
    pub fn drain(&mut self, limit: usize) -> impl Iterator<Item = InboundEvent> + '_ {
        let take = limit.min(self.events.len());
        self.events.drain(..take)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_SIZE)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Event queue full ({max} pending), rejected {event:?}")]
    Full { max: usize, event: Box<InboundEvent> },
}

impl QueueError {
    /// The event that did not fit
    pub fn into_event(self) -> InboundEvent {
        match self {
            QueueError::Full { event, .. } => *event,
        }
    }
}

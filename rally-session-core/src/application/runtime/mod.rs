mod event_queue;
mod session_loop;

pub use event_queue::{EventQueue, QueueError, DEFAULT_QUEUE_SIZE};
pub use session_loop::{SessionLoop, DEFAULT_BATCH_SIZE};

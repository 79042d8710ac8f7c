mod config;
mod events;
pub mod runtime;

pub use config::{SessionConfig, DEFAULT_ADDRESS, DEFAULT_PORT};
pub use events::ConnectionEvent;
pub use runtime::AuthorityLoop;

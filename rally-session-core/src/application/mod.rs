pub mod chat;
mod commands;
mod error;
mod events;
mod member_view;
mod router;
pub mod runtime;

pub use commands::{broadcast, broadcast_except, Outbound, SessionCommand};
pub use error::{RequestKind, SessionError};
pub use events::InboundEvent;
pub use member_view::{ChatLine, MemberView, ViewChange};
pub use router::{Router, RouterConfig, DEFAULT_SCENE};

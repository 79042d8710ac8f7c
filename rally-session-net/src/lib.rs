// Domain layer
pub mod domain;

// Application layer (drivers)
pub mod application;

// Infrastructure layer (adapters)
pub mod infrastructure;

// Re-exports for convenience
pub use application::{AuthorityLoop, ConnectionEvent, SessionConfig};
pub use domain::SessionId;
pub use infrastructure::error::{NetError, Result};
pub use infrastructure::{
    decode_line, encode_line, ClientMessage, MemberClient, MessageKind, PeerTransport,
    TcpTransport, WireMessage, MAX_FRAME_LEN,
};

pub mod connection_trait;
pub mod error;
pub mod frame_reader;
pub mod member_client;
pub mod message;
pub mod tcp;

pub use connection_trait::PeerTransport;
pub use frame_reader::MAX_FRAME_LEN;
pub use member_client::MemberClient;
pub use message::{decode_line, encode_line, ClientMessage, MessageKind, WireMessage};
pub use tcp::TcpTransport;

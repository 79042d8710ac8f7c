use rally_session_core::MemberId;

/// Transport and wire errors
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timed out connecting to {addr} after {secs}s")]
    ConnectTimeout { addr: String, secs: u64 },

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Peer not found: {0}")]
    PeerNotFound(MemberId),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

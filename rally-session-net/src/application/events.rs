use rally_session_core::MemberId;

/// Transport-level events for the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A new peer has connected
    PeerConnected(MemberId),
    /// A peer has disconnected
    PeerDisconnected(MemberId),
    /// Received one raw frame from a peer
    MessageReceived { from: MemberId, line: String },
}

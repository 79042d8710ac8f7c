use crate::application::ConnectionEvent;
use crate::infrastructure::error::Result;
use rally_session_core::MemberId;

/// Authority-side transport (allows mocking in tests)
///
/// Events for one peer must be reported in the order they happened:
/// `PeerConnected`, its frames, then `PeerDisconnected`.
pub trait PeerTransport {
    fn connected_peers(&self) -> Vec<MemberId>;

    /// Queue one encoded frame for `peer`
    fn send_to(&mut self, peer: MemberId, line: String) -> Result<()>;

    fn poll_events(&mut self) -> Vec<ConnectionEvent>;
}

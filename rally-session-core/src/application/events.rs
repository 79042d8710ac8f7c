use crate::application::RequestKind;
use crate::domain::{MemberId, RoundId};

/// Inbound events, each tagged with the transport-assigned origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Transport accepted a peer (registration is a separate step)
    PeerConnected { member: MemberId },

    /// Peer asks to join the directory under a display name
    RegisterRequest {
        member: MemberId,
        display_name: String,
    },

    /// Transport lost a peer
    PeerDisconnected { member: MemberId },

    /// Peer asks to start the game (leader only)
    StartRequest { member: MemberId },

    /// Peer finished loading the scene of `round` (`None`: the armed round)
    ReadyAck {
        member: MemberId,
        round: Option<RoundId>,
    },

    /// Chat line to relay to every member
    ChatMessage { member: MemberId, text: String },
}

impl InboundEvent {
    /// The peer this event came from
    pub fn origin(&self) -> MemberId {
        match self {
            InboundEvent::PeerConnected { member }
            | InboundEvent::RegisterRequest { member, .. }
            | InboundEvent::PeerDisconnected { member }
            | InboundEvent::StartRequest { member }
            | InboundEvent::ReadyAck { member, .. }
            | InboundEvent::ChatMessage { member, .. } => *member,
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            InboundEvent::PeerConnected { .. } => RequestKind::Connect,
            InboundEvent::RegisterRequest { .. } => RequestKind::Register,
            InboundEvent::PeerDisconnected { .. } => RequestKind::Disconnect,
            InboundEvent::StartRequest { .. } => RequestKind::Start,
            InboundEvent::ReadyAck { .. } => RequestKind::Ready,
            InboundEvent::ChatMessage { .. } => RequestKind::Chat,
        }
    }
}

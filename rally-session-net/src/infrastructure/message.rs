use crate::domain::SessionId;
use crate::infrastructure::error::{NetError, Result};
use rally_session_core::{InboundEvent, MemberId, RoundId, SessionCommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One newline-delimited JSON frame on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WireMessage {
    /// Per-sender sequence number
    pub sequence: u64,

    /// Message type discriminator
    #[serde(flatten)]
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessageKind {
    /// First frame from the authority after accept
    Hello {
        member_id: MemberId,
        session_id: SessionId,
    },

    /// Authority → member
    Command(SessionCommand),

    /// Member → authority
    Request(ClientMessage),
}

/// Requests a member can send; the origin is filled in by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Register { display_name: String },
    Start,
    Ready {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<RoundId>,
    },
    Chat { text: String },
}

impl ClientMessage {
    /// Tag the request with the transport-assigned sender
    pub fn into_event(self, member: MemberId) -> InboundEvent {
        match self {
            ClientMessage::Register { display_name } => InboundEvent::RegisterRequest {
                member,
                display_name,
            },
            ClientMessage::Start => InboundEvent::StartRequest { member },
            ClientMessage::Ready { round } => InboundEvent::ReadyAck { member, round },
            ClientMessage::Chat { text } => InboundEvent::ChatMessage { member, text },
        }
    }
}

impl WireMessage {
    pub fn hello(sequence: u64, member_id: MemberId, session_id: SessionId) -> Self {
        Self {
            sequence,
            kind: MessageKind::Hello {
                member_id,
                session_id,
            },
        }
    }

    pub fn command(sequence: u64, command: SessionCommand) -> Self {
        Self {
            sequence,
            kind: MessageKind::Command(command),
        }
    }

    pub fn request(sequence: u64, request: ClientMessage) -> Self {
        Self {
            sequence,
            kind: MessageKind::Request(request),
        }
    }
}

/// Serialize a frame, newline included
pub fn encode_line(message: &WireMessage) -> Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Parse one frame; surrounding whitespace is ignored
pub fn decode_line(line: &str) -> Result<WireMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(NetError::MalformedFrame("empty line".to_string()));
    }
    Ok(serde_json::from_str(trimmed)?)
}

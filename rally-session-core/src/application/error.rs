use crate::domain::{BarrierError, DirectoryError, MemberId, RoundId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request kinds, used to say what a rejection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Connect,
    Register,
    Disconnect,
    Start,
    Ready,
    Chat,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Connect => write!(f, "connect"),
            RequestKind::Register => write!(f, "register"),
            RequestKind::Disconnect => write!(f, "disconnect"),
            RequestKind::Start => write!(f, "start"),
            RequestKind::Ready => write!(f, "ready"),
            RequestKind::Chat => write!(f, "chat"),
        }
    }
}

/// Rejections reported back to the originating peer
///
/// None of these end the session or affect other members. Acknowledgments
/// for superseded rounds are dropped silently and never show up here.
#[derive(
    Debug, Clone, thiserror::Error, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionError {
    #[error("Member already registered: {member}")]
    DuplicateMember { member: MemberId },

    #[error("Not authorized to {action}")]
    NotAuthorized { action: RequestKind },

    #[error("Cannot start a round for an empty session")]
    EmptySession,

    #[error("A readiness round is already armed: {round}")]
    AlreadyArmed { round: RoundId },

    #[error("Readiness round timed out: {round}")]
    ReadinessTimeout { round: RoundId },

    #[error("Session is full (max members: {max})")]
    SessionFull { max: usize },

    #[error("Invalid display name: {reason}")]
    InvalidName { reason: String },
}

impl SessionError {
    pub fn not_authorized(action: RequestKind) -> Self {
        SessionError::NotAuthorized { action }
    }
}

impl From<DirectoryError> for SessionError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateMember(member) => SessionError::DuplicateMember { member },
            DirectoryError::SessionFull { max } => SessionError::SessionFull { max },
            DirectoryError::InvalidName(reason) => SessionError::InvalidName {
                reason: reason.to_string(),
            },
        }
    }
}

impl From<BarrierError> for SessionError {
    fn from(err: BarrierError) -> Self {
        match err {
            BarrierError::AlreadyArmed(round) => SessionError::AlreadyArmed { round },
            BarrierError::EmptySession => SessionError::EmptySession,
        }
    }
}

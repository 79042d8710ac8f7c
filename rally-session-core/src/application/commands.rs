use crate::application::SessionError;
use crate::domain::{MemberId, MemberRecord, RoundId, SessionDirectory};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Commands the coordinator emits for the host to deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Tells a member whether it may start the game
    LeaderStatus { is_leader: bool },

    /// A new member registered
    MemberJoined { member: MemberRecord },

    /// A registered member disconnected
    MemberLeft { member: MemberId },

    /// Full directory, sent to a member right after it registers
    RosterSnapshot { members: Vec<MemberRecord> },

    /// Load `scene`, then acknowledge readiness for `round`
    LoadScene { scene: String, round: RoundId },

    /// Every required member is ready
    GameStart { round: RoundId },

    /// Relayed chat line
    ChatBroadcast { from: MemberId, text: String },

    /// The originator's request was refused
    Rejected { error: SessionError },
}

/// A command addressed to one peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: MemberId,
    pub command: SessionCommand,
}

impl Outbound {
    pub fn to(to: MemberId, command: SessionCommand) -> Self {
        Self { to, command }
    }

    pub fn rejection(to: MemberId, error: SessionError) -> Self {
        Self::to(to, SessionCommand::Rejected { error })
    }
}

/// Fan a command out to every member, oldest first
pub fn broadcast(directory: &SessionDirectory, command: SessionCommand) -> Vec<Outbound> {
    directory
        .member_ids()
        .iter()
        .map(|id| Outbound::to(*id, command.clone()))
        .collect()
}

/// Fan a command out to every member except `skip`
pub fn broadcast_except(
    directory: &SessionDirectory,
    skip: MemberId,
    command: SessionCommand,
) -> Vec<Outbound> {
    directory
        .member_ids()
        .iter()
        .filter(|id| **id != skip)
        .map(|id| Outbound::to(*id, command.clone()))
        .collect()
}

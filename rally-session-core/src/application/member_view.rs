use crate::application::{SessionCommand, SessionError};
use crate::domain::{MemberId, MemberRecord, RoundId};

/// One relayed chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub from: MemberId,
    pub text: String,
}

/// What a command changed in the local view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    LeadershipChanged { is_leader: bool },
    RosterChanged,
    /// Load `scene` and acknowledge `round`
    SceneRequested { scene: String, round: RoundId },
    GameStarted { round: RoundId },
    Chat(ChatLine),
    Rejected(SessionError),
    /// Command carried nothing new
    Unchanged,
}

/// Member-side mirror of the session, fed by the authority's commands
///
/// Holds no authority of its own: every field is whatever the last command
/// said.
#[derive(Debug, Clone)]
pub struct MemberView {
    me: MemberId,
    roster: Vec<MemberRecord>,
    is_leader: bool,
    current_round: Option<RoundId>,
    started_round: Option<RoundId>,
    chat_log: Vec<ChatLine>,
    last_rejection: Option<SessionError>,
}

impl MemberView {
    pub fn new(me: MemberId) -> Self {
        Self {
            me,
            roster: Vec::new(),
            is_leader: false,
            current_round: None,
            started_round: None,
            chat_log: Vec::new(),
            last_rejection: None,
        }
    }

    pub fn apply(&mut self, command: SessionCommand) -> ViewChange {
        match command {
            SessionCommand::LeaderStatus { is_leader } => {
                if self.is_leader == is_leader {
                    return ViewChange::Unchanged;
                }
                self.is_leader = is_leader;
                ViewChange::LeadershipChanged { is_leader }
            }

            SessionCommand::RosterSnapshot { members } => {
                self.roster = members;
                ViewChange::RosterChanged
            }

            SessionCommand::MemberJoined { member } => {
                if self.roster.iter().any(|r| r.id() == member.id()) {
                    return ViewChange::Unchanged;
                }
                self.roster.push(member);
                ViewChange::RosterChanged
            }

            SessionCommand::MemberLeft { member } => {
                let before = self.roster.len();
                self.roster.retain(|r| r.id() != member);
                if self.roster.len() == before {
                    ViewChange::Unchanged
                } else {
                    ViewChange::RosterChanged
                }
            }

            SessionCommand::LoadScene { scene, round } => {
                self.current_round = Some(round);
                ViewChange::SceneRequested { scene, round }
            }

            SessionCommand::GameStart { round } => {
                if self.started_round == Some(round) {
                    return ViewChange::Unchanged;
                }
                self.started_round = Some(round);
                ViewChange::GameStarted { round }
            }

            SessionCommand::ChatBroadcast { from, text } => {
                let line = ChatLine { from, text };
                self.chat_log.push(line.clone());
                ViewChange::Chat(line)
            }

            SessionCommand::Rejected { error } => {
                self.last_rejection = Some(error.clone());
                ViewChange::Rejected(error)
            }
        }
    }

    // ===== Queries =====

    pub fn me(&self) -> MemberId {
        self.me
    }

    /// Known members, oldest first
    pub fn roster(&self) -> &[MemberRecord] {
        &self.roster
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// Round of the most recent `LoadScene`
    pub fn current_round(&self) -> Option<RoundId> {
        self.current_round
    }

    /// Whether the current round has started
    pub fn game_started(&self) -> bool {
        self.current_round.is_some() && self.started_round == self.current_round
    }

    pub fn chat_log(&self) -> &[ChatLine] {
        &self.chat_log
    }

    pub fn last_rejection(&self) -> Option<&SessionError> {
        self.last_rejection.as_ref()
    }

    /// Display name for `id`, as far as this view knows
    pub fn name_of(&self, id: MemberId) -> String {
        if id.is_authority() {
            return "Server".to_string();
        }
        self.roster
            .iter()
            .find(|r| r.id() == id)
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the session a coordinator runs on
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionRole {
    /// Owns the directory and barrier; relays chat
    #[default]
    Authority,
    /// A connected participant
    Member,
}

impl SessionRole {
    pub fn is_authority(&self) -> bool {
        matches!(self, SessionRole::Authority)
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRole::Authority => write!(f, "Authority"),
            SessionRole::Member => write!(f, "Member"),
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum display name length in characters
pub const MAX_NAME_LEN: usize = 32;

/// Transport-assigned identity of a connected peer
///
/// Stable for the lifetime of one connection. The value `1` is reserved for
/// the authority process itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    /// The authority's own id (never registered as a member)
    pub const AUTHORITY: MemberId = MemberId(1);

    pub const fn new(raw: u64) -> Self {
        MemberId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_authority(&self) -> bool {
        *self == Self::AUTHORITY
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for MemberId {
    fn from(raw: u64) -> Self {
        MemberId(raw)
    }
}

/// Monotonic registration counter; never reused within a session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct JoinSequence(u64);

impl JoinSequence {
    pub const FIRST: JoinSequence = JoinSequence(1);

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        JoinSequence(self.0 + 1)
    }
}

impl fmt::Display for JoinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when validating a member
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MemberError {
    #[error("Name must be between 1 and 32 characters")]
    InvalidNameLength,

    #[error("Name cannot contain control characters")]
    ControlCharacters,
}

/// One registered member of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemberRecord {
    id: MemberId,
    name: String,
    join_sequence: JoinSequence,
}

impl MemberRecord {
    pub(crate) fn new(id: MemberId, name: String, join_sequence: JoinSequence) -> Self {
        Self {
            id,
            name,
            join_sequence,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_sequence(&self) -> JoinSequence {
        self.join_sequence
    }
}

/// Normalize a requested display name
///
/// Surrounding whitespace is trimmed. A blank request falls back to
/// `Player{id}`.
pub fn normalize_name(id: MemberId, requested: &str) -> Result<String, MemberError> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(default_name(id));
    }
    validate_name(trimmed)?;
    Ok(trimmed.to_string())
}

/// Default display name for a peer that did not supply one
pub fn default_name(id: MemberId) -> String {
    format!("Player{}", id.as_u64())
}

fn validate_name(name: &str) -> Result<(), MemberError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(MemberError::InvalidNameLength);
    }

    if name.chars().any(char::is_control) {
        return Err(MemberError::ControlCharacters);
    }

    Ok(())
}

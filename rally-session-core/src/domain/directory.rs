use crate::domain::{normalize_name, JoinSequence, MemberError, MemberId, MemberRecord};
use std::collections::HashMap;

/// Default member capacity of a session
pub const DEFAULT_MAX_MEMBERS: usize = 20;

/// Authoritative membership of one session
///
/// Holds the id → record mapping plus the join order. Both always contain
/// the same key set, and the order is ascending by [`JoinSequence`].
#[derive(Debug, Clone)]
pub struct SessionDirectory {
    /// All members (key: member ID)
    members: HashMap<MemberId, MemberRecord>,

    /// Member IDs by join sequence, oldest first
    order: Vec<MemberId>,

    /// Sequence handed to the next registration
    next_sequence: JoinSequence,

    max_members: usize,
}

/// Errors that can occur in directory operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Member already registered: {0}")]
    DuplicateMember(MemberId),

    #[error("Session is full (max members: {max})")]
    SessionFull { max: usize },

    #[error("Invalid display name: {0}")]
    InvalidName(#[from] MemberError),
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_MEMBERS)
    }

    pub fn with_capacity(max_members: usize) -> Self {
        Self {
            members: HashMap::with_capacity(max_members),
            order: Vec::with_capacity(max_members),
            next_sequence: JoinSequence::FIRST,
            max_members,
        }
    }

    // ===== Mutations =====

    /// Register a member under the next join sequence
    ///
    /// Re-registering a present id is rejected; the existing record and its
    /// sequence are left untouched.
    pub fn register(
        &mut self,
        id: MemberId,
        display_name: &str,
    ) -> Result<MemberRecord, DirectoryError> {
        if self.members.contains_key(&id) {
            return Err(DirectoryError::DuplicateMember(id));
        }

        if self.members.len() >= self.max_members {
            return Err(DirectoryError::SessionFull {
                max: self.max_members,
            });
        }

        let name = normalize_name(id, display_name)?;
        let record = MemberRecord::new(id, name, self.next_sequence);
        self.next_sequence = self.next_sequence.next();

        self.members.insert(id, record.clone());
        self.order.push(id);

        tracing::debug!(
            "Registered member {} as '{}' (seq {})",
            id,
            record.name(),
            record.join_sequence()
        );

        Ok(record)
    }

    /// Remove a member, returning its record if it was present
    pub fn remove(&mut self, id: MemberId) -> Option<MemberRecord> {
        let record = self.members.remove(&id)?;
        self.order.retain(|member| *member != id);

        tracing::debug!("Removed member {} ('{}')", id, record.name());

        Some(record)
    }

    // ===== Queries =====

    /// All records, oldest registration first
    pub fn snapshot(&self) -> Vec<MemberRecord> {
        self.order
            .iter()
            .filter_map(|id| self.members.get(id))
            .cloned()
            .collect()
    }

    /// Member IDs, oldest registration first
    pub fn member_ids(&self) -> &[MemberId] {
        &self.order
    }

    pub fn get(&self, id: MemberId) -> Option<&MemberRecord> {
        self.members.get(&id)
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_members
    }

    /// The record with the smallest join sequence
    pub(crate) fn oldest(&self) -> Option<&MemberRecord> {
        self.order.first().and_then(|id| self.members.get(id))
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

use crate::domain::{MemberId, SessionDirectory};

/// The member with the smallest join sequence, or `None` for an empty session
///
/// Join sequences are unique, so no tie-break is needed.
pub fn current_leader(directory: &SessionDirectory) -> Option<MemberId> {
    directory.oldest().map(|record| record.id())
}

/// Leader identity before and after a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderChange {
    pub previous: Option<MemberId>,
    pub current: Option<MemberId>,
}

impl LeaderChange {
    /// Compare a remembered leader with the directory's current one
    pub fn between(previous: Option<MemberId>, directory: &SessionDirectory) -> Self {
        Self {
            previous,
            current: current_leader(directory),
        }
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// Newly elected leader, if the leadership moved to someone
    pub fn promoted(&self) -> Option<MemberId> {
        if self.changed() {
            self.current
        } else {
            None
        }
    }
}

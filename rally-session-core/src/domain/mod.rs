pub mod barrier;
pub mod directory;
pub mod election;
pub mod member;
pub mod role;

pub use barrier::{
    AckOutcome, BarrierError, BarrierState, DepartureOutcome, IgnoreReason, ReadinessBarrier,
    ReadinessRound, RoundId,
};
pub use directory::{DirectoryError, SessionDirectory, DEFAULT_MAX_MEMBERS};
pub use election::{current_leader, LeaderChange};
pub use member::{
    default_name, normalize_name, JoinSequence, MemberError, MemberId, MemberRecord, MAX_NAME_LEN,
};
pub use role::SessionRole;

pub mod application;
pub mod domain;

pub use application::{
    runtime::{EventQueue, QueueError, SessionLoop},
    InboundEvent, MemberView, Outbound, RequestKind, Router, RouterConfig, SessionCommand,
    SessionError, ViewChange,
};
pub use domain::{
    MemberId, MemberRecord, ReadinessBarrier, RoundId, SessionDirectory, SessionRole,
};

use crate::domain::MemberId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic identifier of one arm-to-release cycle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RoundId(u64);

impl RoundId {
    pub const fn new(raw: u64) -> Self {
        RoundId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round-{}", self.0)
    }
}

/// One armed round
///
/// `acknowledged` is always a subset of `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessRound {
    id: RoundId,
    required: BTreeSet<MemberId>,
    acknowledged: BTreeSet<MemberId>,
    armed_at: Instant,
}

impl ReadinessRound {
    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn required(&self) -> &BTreeSet<MemberId> {
        &self.required
    }

    pub fn acknowledged(&self) -> &BTreeSet<MemberId> {
        &self.acknowledged
    }

    pub fn armed_at(&self) -> Instant {
        self.armed_at
    }

    /// Members that still have to acknowledge
    pub fn outstanding(&self) -> Vec<MemberId> {
        self.required
            .difference(&self.acknowledged)
            .copied()
            .collect()
    }

    fn is_complete(&self) -> bool {
        !self.required.is_empty() && self.acknowledged == self.required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    Idle,
    Armed(RoundId),
}

/// Errors that can occur when arming the barrier
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BarrierError {
    #[error("A readiness round is already armed: {0}")]
    AlreadyArmed(RoundId),

    #[error("Cannot arm a round for an empty session")]
    EmptySession,
}

/// Why an acknowledgment did not count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No round is armed
    Idle,
    /// The acknowledgment names a superseded round
    StaleRound,
    /// The member was not part of the round's snapshot
    NotRequired,
    /// The member already acknowledged this round
    AlreadyAcknowledged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    Recorded { round: RoundId, remaining: usize },
    /// Last outstanding acknowledgment arrived; the barrier is Idle again
    Released(RoundId),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureOutcome {
    /// No round armed, or the member was not required
    Unaffected,
    /// Required set shrank but members are still outstanding
    Shrunk { round: RoundId, remaining: usize },
    /// The departure left every remaining member acknowledged
    Released(RoundId),
    /// Every required member departed; the round was discarded
    Abandoned(RoundId),
}

/// Readiness barrier: Idle → Armed → (release) → Idle
///
/// A required member that disconnects mid-round is dropped from the
/// required set, so the round can still complete with the members that
/// remain connected.
#[derive(Debug, Clone)]
pub struct ReadinessBarrier {
    current: Option<ReadinessRound>,
    next_round: RoundId,
    releases: u64,
}

impl ReadinessBarrier {
    pub fn new() -> Self {
        Self {
            current: None,
            next_round: RoundId(1),
            releases: 0,
        }
    }

    pub fn state(&self) -> BarrierState {
        match &self.current {
            Some(round) => BarrierState::Armed(round.id),
            None => BarrierState::Idle,
        }
    }

    pub fn current_round(&self) -> Option<&ReadinessRound> {
        self.current.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.current.is_some()
    }

    /// Number of rounds released since creation
    pub fn releases(&self) -> u64 {
        self.releases
    }

    /// Arm a new round requiring every member in `members`
    pub fn arm<I>(&mut self, members: I, now: Instant) -> Result<RoundId, BarrierError>
    where
        I: IntoIterator<Item = MemberId>,
    {
        if let Some(round) = &self.current {
            return Err(BarrierError::AlreadyArmed(round.id));
        }

        let required: BTreeSet<MemberId> = members.into_iter().collect();
        if required.is_empty() {
            return Err(BarrierError::EmptySession);
        }

        let id = self.next_round;
        self.next_round = RoundId(id.0 + 1);

        tracing::info!("Armed {} requiring {} members", id, required.len());

        self.current = Some(ReadinessRound {
            id,
            required,
            acknowledged: BTreeSet::new(),
            armed_at: now,
        });

        Ok(id)
    }

    /// Record that `member` is ready
    ///
    /// `round` of `None` targets whichever round is armed. Stale rounds and
    /// members outside the snapshot are ignored, never errors.
    pub fn acknowledge(&mut self, round: Option<RoundId>, member: MemberId) -> AckOutcome {
        let Some(current) = self.current.as_mut() else {
            return AckOutcome::Ignored(IgnoreReason::Idle);
        };

        if round.is_some_and(|r| r != current.id) {
            tracing::debug!("Ignoring ack from {} for stale round {:?}", member, round);
            return AckOutcome::Ignored(IgnoreReason::StaleRound);
        }

        if !current.required.contains(&member) {
            tracing::debug!("Ignoring ack from {}: not required by {}", member, current.id);
            return AckOutcome::Ignored(IgnoreReason::NotRequired);
        }

        if !current.acknowledged.insert(member) {
            return AckOutcome::Ignored(IgnoreReason::AlreadyAcknowledged);
        }

        let id = current.id;
        if current.is_complete() {
            self.release()
        } else {
            let remaining = current.required.len() - current.acknowledged.len();
            tracing::debug!("{} acknowledged {} ({} remaining)", member, id, remaining);
            AckOutcome::Recorded {
                round: id,
                remaining,
            }
        }
    }

    /// Apply the shrink policy for a disconnected member
    pub fn member_departed(&mut self, member: MemberId) -> DepartureOutcome {
        let Some(current) = self.current.as_mut() else {
            return DepartureOutcome::Unaffected;
        };

        if !current.required.remove(&member) {
            return DepartureOutcome::Unaffected;
        }
        current.acknowledged.remove(&member);

        let id = current.id;
        if current.required.is_empty() {
            tracing::warn!("All required members left, abandoning {}", id);
            self.current = None;
            return DepartureOutcome::Abandoned(id);
        }

        if current.is_complete() {
            match self.release() {
                AckOutcome::Released(id) => DepartureOutcome::Released(id),
                _ => DepartureOutcome::Unaffected,
            }
        } else {
            let remaining = current.required.len() - current.acknowledged.len();
            tracing::info!("{} shrank after {} left ({} remaining)", id, member, remaining);
            DepartureOutcome::Shrunk {
                round: id,
                remaining,
            }
        }
    }

    /// Abort the armed round if it has been outstanding longer than `timeout`
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Option<RoundId> {
        let round = self.current.as_ref()?;
        if now.saturating_duration_since(round.armed_at) < timeout {
            return None;
        }

        let id = round.id;
        tracing::warn!(
            "{} timed out with {} members outstanding",
            id,
            round.outstanding().len()
        );
        self.current = None;
        Some(id)
    }

    fn release(&mut self) -> AckOutcome {
        match self.current.take() {
            Some(round) => {
                self.releases += 1;
                tracing::info!("🏁 {} released", round.id);
                AckOutcome::Released(round.id)
            }
            None => AckOutcome::Ignored(IgnoreReason::Idle),
        }
    }
}

impl Default for ReadinessBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<MemberId> {
        raw.iter().copied().map(MemberId::new).collect()
    }

    fn id(raw: u64) -> MemberId {
        MemberId::new(raw)
    }

    #[test]
    fn test_arm_empty_session_fails() {
        let mut barrier = ReadinessBarrier::new();

        let result = barrier.arm(Vec::new(), Instant::now());

        assert_eq!(result, Err(BarrierError::EmptySession));
        assert_eq!(barrier.state(), BarrierState::Idle);
    }

    #[test]
    fn test_arm_twice_fails() {
        let mut barrier = ReadinessBarrier::new();
        let round = barrier.arm(ids(&[2, 3]), Instant::now()).unwrap();

        let result = barrier.arm(ids(&[2, 3]), Instant::now());

        assert_eq!(result, Err(BarrierError::AlreadyArmed(round)));
        assert_eq!(barrier.state(), BarrierState::Armed(round));
    }

    #[test]
    fn test_releases_exactly_once() {
        let mut barrier = ReadinessBarrier::new();
        let round = barrier.arm(ids(&[2, 3]), Instant::now()).unwrap();

        assert_eq!(
            barrier.acknowledge(Some(round), id(3)),
            AckOutcome::Recorded {
                round,
                remaining: 1
            }
        );
        assert_eq!(
            barrier.acknowledge(Some(round), id(3)),
            AckOutcome::Ignored(IgnoreReason::AlreadyAcknowledged)
        );
        assert_eq!(
            barrier.acknowledge(None, id(2)),
            AckOutcome::Released(round)
        );

        // Late duplicates after release are ignored
        assert_eq!(
            barrier.acknowledge(Some(round), id(2)),
            AckOutcome::Ignored(IgnoreReason::Idle)
        );
        assert_eq!(barrier.releases(), 1);
        assert_eq!(barrier.state(), BarrierState::Idle);
    }

    #[test]
    fn test_ack_from_late_joiner_ignored() {
        let mut barrier = ReadinessBarrier::new();
        barrier.arm(ids(&[2]), Instant::now()).unwrap();

        assert_eq!(
            barrier.acknowledge(None, id(9)),
            AckOutcome::Ignored(IgnoreReason::NotRequired)
        );
    }

    #[test]
    fn test_stale_round_ignored() {
        let mut barrier = ReadinessBarrier::new();
        let first = barrier.arm(ids(&[2]), Instant::now()).unwrap();
        barrier.acknowledge(Some(first), id(2));

        let second = barrier.arm(ids(&[2, 3]), Instant::now()).unwrap();
        assert_ne!(first, second);

        assert_eq!(
            barrier.acknowledge(Some(first), id(2)),
            AckOutcome::Ignored(IgnoreReason::StaleRound)
        );
        assert!(barrier.current_round().unwrap().acknowledged().is_empty());
    }

    #[test]
    fn test_departure_shrinks_required_set() {
        let mut barrier = ReadinessBarrier::new();
        let round = barrier.arm(ids(&[1, 2, 3]), Instant::now()).unwrap();

        assert_eq!(
            barrier.member_departed(id(2)),
            DepartureOutcome::Shrunk {
                round,
                remaining: 2
            }
        );
        assert_eq!(barrier.current_round().unwrap().required().len(), 2);

        barrier.acknowledge(None, id(1));
        assert_eq!(barrier.acknowledge(None, id(3)), AckOutcome::Released(round));
        assert_eq!(barrier.releases(), 1);
    }

    #[test]
    fn test_departure_of_last_outstanding_member_releases() {
        let mut barrier = ReadinessBarrier::new();
        let round = barrier.arm(ids(&[2, 3]), Instant::now()).unwrap();
        barrier.acknowledge(None, id(2));

        assert_eq!(barrier.member_departed(id(3)), DepartureOutcome::Released(round));
        assert_eq!(barrier.state(), BarrierState::Idle);
    }

    #[test]
    fn test_departure_of_acknowledged_member_keeps_subset() {
        let mut barrier = ReadinessBarrier::new();
        barrier.arm(ids(&[2, 3]), Instant::now()).unwrap();
        barrier.acknowledge(None, id(2));

        barrier.member_departed(id(2));

        let round = barrier.current_round().unwrap();
        assert!(round.acknowledged().is_subset(round.required()));
        assert_eq!(round.outstanding(), ids(&[3]));
    }

    #[test]
    fn test_all_required_departed_abandons_round() {
        let mut barrier = ReadinessBarrier::new();
        let round = barrier.arm(ids(&[2]), Instant::now()).unwrap();

        assert_eq!(barrier.member_departed(id(2)), DepartureOutcome::Abandoned(round));
        assert_eq!(barrier.state(), BarrierState::Idle);
        assert_eq!(barrier.releases(), 0);
    }

    #[test]
    fn test_departure_of_unrequired_member_is_unaffected() {
        let mut barrier = ReadinessBarrier::new();
        assert_eq!(barrier.member_departed(id(2)), DepartureOutcome::Unaffected);

        barrier.arm(ids(&[2]), Instant::now()).unwrap();
        assert_eq!(barrier.member_departed(id(5)), DepartureOutcome::Unaffected);
    }

    #[test]
    fn test_expire_after_timeout() {
        let mut barrier = ReadinessBarrier::new();
        let armed_at = Instant::now();
        let round = barrier.arm(ids(&[2]), armed_at).unwrap();

        let timeout = Duration::from_secs(5);
        assert_eq!(barrier.expire(armed_at + Duration::from_secs(1), timeout), None);
        assert_eq!(
            barrier.expire(armed_at + Duration::from_secs(5), timeout),
            Some(round)
        );
        assert_eq!(barrier.state(), BarrierState::Idle);
    }

    #[test]
    fn test_round_ids_increase() {
        let mut barrier = ReadinessBarrier::new();
        let first = barrier.arm(ids(&[2]), Instant::now()).unwrap();
        barrier.acknowledge(None, id(2));
        let second = barrier.arm(ids(&[2]), Instant::now()).unwrap();

        assert!(second > first);
    }
}

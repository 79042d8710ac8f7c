use crate::application::{
    broadcast, broadcast_except, chat, InboundEvent, Outbound, RequestKind, SessionCommand,
    SessionError,
};
use crate::domain::{
    current_leader, AckOutcome, DepartureOutcome, LeaderChange, MemberId, ReadinessBarrier,
    SessionDirectory, SessionRole, DEFAULT_MAX_MEMBERS,
};
use std::time::{Duration, Instant};

/// Default scene members are told to load when the game starts
pub const DEFAULT_SCENE: &str = "res://Scenes/Game.tscn";

/// Router settings
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Scene path sent with `LoadScene`
    pub scene: String,

    /// Directory capacity
    pub max_members: usize,

    /// Abort an armed round after this long (`None`: wait forever)
    pub ready_timeout: Option<Duration>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            scene: DEFAULT_SCENE.to_string(),
            max_members: DEFAULT_MAX_MEMBERS,
            ready_timeout: None,
        }
    }
}

impl RouterConfig {
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = scene.into();
        self
    }

    pub fn with_max_members(mut self, max_members: usize) -> Self {
        self.max_members = max_members;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = Some(timeout);
        self
    }
}

/// Message router: applies inbound events to the directory and barrier and
/// returns the commands to deliver
///
/// Owns the only copy of session state; callers serialize events into it.
#[derive(Debug, Clone)]
pub struct Router {
    role: SessionRole,
    config: RouterConfig,
    directory: SessionDirectory,
    barrier: ReadinessBarrier,

    /// Leader as last announced, for change detection
    leader: Option<MemberId>,
}

impl Router {
    pub fn new(role: SessionRole, config: RouterConfig) -> Self {
        Self {
            role,
            directory: SessionDirectory::with_capacity(config.max_members),
            barrier: ReadinessBarrier::new(),
            leader: None,
            config,
        }
    }

    /// Authority-role router with default settings
    pub fn authority() -> Self {
        Self::new(SessionRole::Authority, RouterConfig::default())
    }

    // ===== Queries =====

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    pub fn barrier(&self) -> &ReadinessBarrier {
        &self.barrier
    }

    pub fn leader(&self) -> Option<MemberId> {
        current_leader(&self.directory)
    }

    // ===== Dispatch =====

    /// Apply one event at the current instant
    pub fn handle(&mut self, event: InboundEvent) -> Vec<Outbound> {
        self.handle_at(event, Instant::now())
    }

    /// Apply one event; failures become a `Rejected` for the originator
    pub fn handle_at(&mut self, event: InboundEvent, now: Instant) -> Vec<Outbound> {
        let origin = event.origin();
        let kind = event.kind();

        match self.apply(event, now) {
            Ok(out) => out,
            Err(error) => {
                tracing::warn!("❌ Rejected {} from {}: {}", kind, origin, error);
                vec![Outbound::rejection(origin, error)]
            }
        }
    }

    /// Abort the armed round if the readiness deadline passed
    ///
    /// The current leader is told with `ReadinessTimeout`.
    pub fn expire_round(&mut self, now: Instant) -> Vec<Outbound> {
        let Some(timeout) = self.config.ready_timeout else {
            return Vec::new();
        };

        match self.barrier.expire(now, timeout) {
            Some(round) => match self.leader() {
                Some(leader) => vec![Outbound::rejection(
                    leader,
                    SessionError::ReadinessTimeout { round },
                )],
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    fn apply(&mut self, event: InboundEvent, now: Instant) -> Result<Vec<Outbound>, SessionError> {
        match event {
            InboundEvent::PeerConnected { member } => {
                tracing::info!("🟢 Peer connected: {}", member);
                Ok(Vec::new())
            }

            InboundEvent::RegisterRequest {
                member,
                display_name,
            } => self.handle_register(member, &display_name),

            InboundEvent::PeerDisconnected { member } => Ok(self.handle_disconnect(member)),

            InboundEvent::StartRequest { member } => self.handle_start(member, now),

            InboundEvent::ReadyAck { member, round } => Ok(self.handle_ready(member, round)),

            InboundEvent::ChatMessage { member, text } => self.handle_chat(member, &text),
        }
    }

    fn handle_register(
        &mut self,
        member: MemberId,
        display_name: &str,
    ) -> Result<Vec<Outbound>, SessionError> {
        if member.is_authority() {
            return Err(SessionError::not_authorized(RequestKind::Register));
        }

        let record = self.directory.register(member, display_name)?;
        tracing::info!("👤 {} registered as '{}'", member, record.name());

        let change = self.refresh_leader();

        let mut out = vec![
            Outbound::to(
                member,
                SessionCommand::LeaderStatus {
                    is_leader: change.current == Some(member),
                },
            ),
            Outbound::to(
                member,
                SessionCommand::RosterSnapshot {
                    members: self.directory.snapshot(),
                },
            ),
        ];

        if let Some(promoted) = change.promoted().filter(|id| *id != member) {
            out.push(Outbound::to(
                promoted,
                SessionCommand::LeaderStatus { is_leader: true },
            ));
        }

        out.extend(broadcast_except(
            &self.directory,
            member,
            SessionCommand::MemberJoined { member: record },
        ));

        Ok(out)
    }

    fn handle_disconnect(&mut self, member: MemberId) -> Vec<Outbound> {
        let Some(record) = self.directory.remove(member) else {
            tracing::debug!("Unregistered peer {} disconnected", member);
            return Vec::new();
        };

        tracing::info!("🔴 {} ('{}') left", member, record.name());

        let mut out = broadcast(&self.directory, SessionCommand::MemberLeft { member });

        let change = self.refresh_leader();
        if let Some(leader) = change.promoted() {
            tracing::info!("👑 Leadership passed to {}", leader);
            out.push(Outbound::to(
                leader,
                SessionCommand::LeaderStatus { is_leader: true },
            ));
        }

        match self.barrier.member_departed(member) {
            DepartureOutcome::Released(round) => {
                out.extend(broadcast(&self.directory, SessionCommand::GameStart { round }));
            }
            DepartureOutcome::Abandoned(round) => {
                tracing::info!("{} discarded, no required members left", round);
            }
            DepartureOutcome::Shrunk { .. } | DepartureOutcome::Unaffected => {}
        }

        out
    }

    fn handle_start(
        &mut self,
        member: MemberId,
        now: Instant,
    ) -> Result<Vec<Outbound>, SessionError> {
        if !self.role.is_authority() || self.leader() != Some(member) {
            return Err(SessionError::not_authorized(RequestKind::Start));
        }

        let round = self
            .barrier
            .arm(self.directory.member_ids().iter().copied(), now)?;

        tracing::info!("🚀 {} started the game ({})", member, round);

        Ok(broadcast(
            &self.directory,
            SessionCommand::LoadScene {
                scene: self.config.scene.clone(),
                round,
            },
        ))
    }

    fn handle_ready(
        &mut self,
        member: MemberId,
        round: Option<crate::domain::RoundId>,
    ) -> Vec<Outbound> {
        match self.barrier.acknowledge(round, member) {
            AckOutcome::Released(round) => {
                broadcast(&self.directory, SessionCommand::GameStart { round })
            }
            AckOutcome::Recorded { .. } => Vec::new(),
            AckOutcome::Ignored(reason) => {
                tracing::debug!("Ack from {} ignored: {:?}", member, reason);
                Vec::new()
            }
        }
    }

    fn handle_chat(&mut self, member: MemberId, text: &str) -> Result<Vec<Outbound>, SessionError> {
        let may_relay = self.role.is_authority()
            && (member.is_authority() || self.directory.contains(member));
        if !may_relay {
            return Err(SessionError::not_authorized(RequestKind::Chat));
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(chat::relay(&self.directory, member, text))
    }

    fn refresh_leader(&mut self) -> LeaderChange {
        let change = LeaderChange::between(self.leader, &self.directory);
        self.leader = change.current;
        change
    }
}

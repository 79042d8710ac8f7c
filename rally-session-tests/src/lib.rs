use cucumber::World;
use rally_session_core::{
    InboundEvent, MemberId, Outbound, Router, RouterConfig, SessionCommand, SessionError,
    SessionRole,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// First id the simulated transport hands out; 1 is the authority
const FIRST_MEMBER_ID: u64 = 2;

#[derive(Debug, World)]
pub struct SessionWorld {
    /// Message router (the system under test)
    pub router: Router,

    /// Transport ids by member name
    pub members: HashMap<String, MemberId>,

    /// Commands produced by the last event
    pub last_outbound: Vec<Outbound>,

    /// Every command produced since the log was last cleared
    pub outbound_log: Vec<Outbound>,

    next_id: u64,
    epoch: Instant,
    elapsed: Duration,
}

impl SessionWorld {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            router: Router::new(SessionRole::Authority, config),
            members: HashMap::new(),
            last_outbound: Vec::new(),
            outbound_log: Vec::new(),
            next_id: FIRST_MEMBER_ID,
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Replace the router, forgetting every member
    pub fn reset(&mut self, config: RouterConfig) {
        *self = Self::with_config(config);
    }

    pub fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }

    /// Let simulated time pass and run the deadline check
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
        let out = self.router.expire_round(self.now());
        self.record(out);
    }

    /// Apply one event and record what it produced
    pub fn send(&mut self, event: InboundEvent) {
        let out = self.router.handle_at(event, self.now());
        self.record(out);
    }

    fn record(&mut self, out: Vec<Outbound>) {
        self.outbound_log.extend(out.iter().cloned());
        self.last_outbound = out;
    }

    /// Transport id for `name`, connecting it first if needed
    pub fn connect(&mut self, name: &str) -> MemberId {
        if let Some(id) = self.members.get(name) {
            return *id;
        }

        let id = MemberId::new(self.next_id);
        self.next_id += 1;
        self.members.insert(name.to_string(), id);
        self.send(InboundEvent::PeerConnected { member: id });
        id
    }

    /// Connect and register `name` under its own name
    pub fn join(&mut self, name: &str) -> MemberId {
        let id = self.connect(name);
        self.send(InboundEvent::RegisterRequest {
            member: id,
            display_name: name.to_string(),
        });
        id
    }

    pub fn member(&self, name: &str) -> MemberId {
        *self
            .members
            .get(name)
            .unwrap_or_else(|| panic!("Member '{}' not found", name))
    }

    /// Commands the last event sent to `name`
    pub fn last_commands_for(&self, name: &str) -> Vec<SessionCommand> {
        let id = self.member(name);
        self.last_outbound
            .iter()
            .filter(|o| o.to == id)
            .map(|o| o.command.clone())
            .collect()
    }

    /// Commands sent to `name` since the log was cleared
    pub fn logged_commands_for(&self, name: &str) -> Vec<SessionCommand> {
        let id = self.member(name);
        self.outbound_log
            .iter()
            .filter(|o| o.to == id)
            .map(|o| o.command.clone())
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.outbound_log.clear();
    }

    /// Wire name of a rejection, e.g. `not_authorized`
    pub fn rejection_kind(error: &SessionError) -> String {
        serde_json::to_value(error)
            .ok()
            .and_then(|v| v.get("kind").and_then(|k| k.as_str()).map(str::to_string))
            .unwrap_or_default()
    }
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::new()
    }
}

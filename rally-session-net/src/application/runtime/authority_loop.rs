use crate::application::{ConnectionEvent, SessionConfig};
use crate::domain::SessionId;
use crate::infrastructure::connection_trait::PeerTransport;
use crate::infrastructure::message::{decode_line, encode_line, MessageKind, WireMessage};
use rally_session_core::{InboundEvent, MemberId, Outbound, Router, SessionLoop, SessionRole};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::mpsc;

/// Authority driver: transport events in, router commands out
/// Generic over transport type to allow mocking in tests
pub struct AuthorityLoop<T: PeerTransport> {
    session: SessionLoop,
    transport: T,
    session_id: SessionId,
    config: SessionConfig,

    /// Sequence stamped on the next outgoing frame
    sequence: u64,
}

impl<T: PeerTransport> AuthorityLoop<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let router = Router::new(SessionRole::Authority, config.router_config());
        let session_id = SessionId::new();

        tracing::info!("🏠 Hosting session {}", session_id);

        Self {
            session: SessionLoop::new(router, config.batch_size, config.queue_size),
            transport,
            session_id,
            config,
            sequence: 0,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn router(&self) -> &Router {
        self.session.router()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Relay a chat line typed at the authority console
    pub fn say(&mut self, text: impl Into<String>) {
        self.enqueue(InboundEvent::ChatMessage {
            member: MemberId::AUTHORITY,
            text: text.into(),
        });
    }

    /// One pass: transport events, router, deadline check, delivery
    /// Returns number of events processed
    pub fn poll(&mut self) -> usize {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> usize {
        let mut processed = 0;

        for event in self.transport.poll_events() {
            processed += 1;
            match event {
                ConnectionEvent::PeerConnected(member) => {
                    self.send_hello(member);
                    self.enqueue(InboundEvent::PeerConnected { member });
                }
                ConnectionEvent::PeerDisconnected(member) => {
                    self.enqueue(InboundEvent::PeerDisconnected { member });
                }
                ConnectionEvent::MessageReceived { from, line } => {
                    self.handle_frame(from, &line);
                }
            }
        }

        self.flush();
        self.session.tick(now);
        self.deliver();

        processed
    }

    /// Poll until the process is stopped; console lines become chat
    pub async fn run(&mut self, mut console: mpsc::Receiver<String>) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        let mut console_open = true;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.poll();
                }
                line = console.recv(), if console_open => match line {
                    Some(text) => self.say(text),
                    None => console_open = false,
                },
            }
        }
    }

    fn handle_frame(&mut self, from: MemberId, line: &str) {
        match decode_line(line) {
            Ok(WireMessage {
                kind: MessageKind::Request(request),
                ..
            }) => self.enqueue(request.into_event(from)),
            Ok(other) => {
                tracing::warn!("Ignoring non-request frame from {}: {:?}", from, other.kind);
            }
            Err(e) => {
                tracing::warn!("Dropping malformed frame from {}: {}", from, e);
            }
        }
    }

    /// Submit an event, draining the queue first if it is full
    fn enqueue(&mut self, event: InboundEvent) {
        if let Err(full) = self.session.submit(event) {
            tracing::debug!("{}, flushing", full);
            self.flush();
            self.deliver();
            if let Err(e) = self.session.submit(full.into_event()) {
                tracing::error!("Dropping event after flush: {}", e);
            }
        }
    }

    fn flush(&mut self) {
        while self.session.poll() > 0 {}
    }

    /// Send queued commands to peers the transport still holds
    ///
    /// A member whose connection is already gone stays in the directory
    /// until its disconnect event is routed; commands addressed to it in
    /// the meantime are dropped here.
    fn deliver(&mut self) {
        let outbound = self.session.drain_outbound();
        if outbound.is_empty() {
            return;
        }

        let connected: HashSet<MemberId> =
            self.transport.connected_peers().into_iter().collect();

        for Outbound { to, command } in outbound {
            if !connected.contains(&to) {
                tracing::trace!("Skipping {:?} for departed {}", command, to);
                continue;
            }
            let frame = WireMessage::command(self.next_sequence(), command);
            self.send_frame(to, &frame);
        }
    }

    fn send_hello(&mut self, member: MemberId) {
        let frame = WireMessage::hello(self.next_sequence(), member, self.session_id);
        self.send_frame(member, &frame);
    }

    fn send_frame(&mut self, to: MemberId, frame: &WireMessage) {
        let line = match encode_line(frame) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to encode frame for {}: {}", to, e);
                return;
            }
        };

        // The disconnect arrives as its own event; nothing to do here
        if let Err(e) = self.transport.send_to(to, line) {
            tracing::debug!("Send to {} failed: {}", to, e);
        }
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

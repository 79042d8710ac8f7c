use rally_session_core::{MemberId, SessionCommand};
use rally_session_net::{
    decode_line, encode_line, ClientMessage, ConnectionEvent, MessageKind, NetError,
    PeerTransport, Result, SessionId, WireMessage,
};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Shared in-memory network (test side drives peers, loop side polls)
#[derive(Default)]
pub struct MockNetwork {
    pub pending: VecDeque<ConnectionEvent>,
    pub connected: BTreeSet<MemberId>,
    pub delivered: HashMap<MemberId, Vec<WireMessage>>,

    /// `send_to` calls for peers that were no longer connected
    pub failed_sends: usize,
}

/// Transport handed to the `AuthorityLoop`
pub struct MockTransport {
    network: Arc<Mutex<MockNetwork>>,
}

impl MockTransport {
    pub fn new(network: Arc<Mutex<MockNetwork>>) -> Self {
        Self { network }
    }
}

impl PeerTransport for MockTransport {
    fn connected_peers(&self) -> Vec<MemberId> {
        self.network.lock().unwrap().connected.iter().copied().collect()
    }

    fn send_to(&mut self, peer: MemberId, line: String) -> Result<()> {
        let mut network = self.network.lock().unwrap();
        if !network.connected.contains(&peer) {
            network.failed_sends += 1;
            return Err(NetError::PeerNotFound(peer));
        }

        let frame = decode_line(&line)?;
        network.delivered.entry(peer).or_default().push(frame);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<ConnectionEvent> {
        self.network.lock().unwrap().pending.drain(..).collect()
    }
}

/// Test-side handle for simulating peers
#[derive(Clone)]
pub struct MockPeers {
    network: Arc<Mutex<MockNetwork>>,
    sequence: Arc<Mutex<u64>>,
}

impl MockPeers {
    pub fn connect(&self, raw: u64) -> MemberId {
        let member = MemberId::new(raw);
        let mut network = self.network.lock().unwrap();
        network.connected.insert(member);
        network.pending.push_back(ConnectionEvent::PeerConnected(member));
        member
    }

    pub fn disconnect(&self, member: MemberId) {
        let mut network = self.network.lock().unwrap();
        network.connected.remove(&member);
        network
            .pending
            .push_back(ConnectionEvent::PeerDisconnected(member));
    }

    pub fn send(&self, from: MemberId, request: ClientMessage) {
        let sequence = {
            let mut seq = self.sequence.lock().unwrap();
            *seq += 1;
            *seq
        };
        let line = encode_line(&WireMessage::request(sequence, request)).unwrap();
        self.send_raw(from, line.trim_end());
    }

    pub fn send_raw(&self, from: MemberId, line: &str) {
        self.network
            .lock()
            .unwrap()
            .pending
            .push_back(ConnectionEvent::MessageReceived {
                from,
                line: line.to_string(),
            });
    }

    /// Drain every command delivered to `member` so far
    pub fn take_commands(&self, member: MemberId) -> Vec<SessionCommand> {
        self.take_frames(member)
            .into_iter()
            .filter_map(|frame| match frame.kind {
                MessageKind::Command(command) => Some(command),
                _ => None,
            })
            .collect()
    }

    pub fn take_frames(&self, member: MemberId) -> Vec<WireMessage> {
        self.network
            .lock()
            .unwrap()
            .delivered
            .remove(&member)
            .unwrap_or_default()
    }

    pub fn failed_sends(&self) -> usize {
        self.network.lock().unwrap().failed_sends
    }

    pub fn hello_for(&self, member: MemberId) -> Option<(MemberId, SessionId)> {
        let network = self.network.lock().unwrap();
        network
            .delivered
            .get(&member)?
            .iter()
            .find_map(|frame| match frame.kind {
                MessageKind::Hello {
                    member_id,
                    session_id,
                } => Some((member_id, session_id)),
                _ => None,
            })
    }
}

/// Create a transport and the handle that drives it
pub fn create_mock_network() -> (MockTransport, MockPeers) {
    let network = Arc::new(Mutex::new(MockNetwork::default()));
    (
        MockTransport::new(network.clone()),
        MockPeers {
            network,
            sequence: Arc::new(Mutex::new(0)),
        },
    )
}

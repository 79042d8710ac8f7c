#![allow(dead_code)]

pub mod mock_transport;

use mock_transport::{create_mock_network, MockPeers, MockTransport};
use rally_session_core::MemberId;
use rally_session_net::{AuthorityLoop, ClientMessage, SessionConfig};

/// Authority loop on a mock network
pub struct AuthorityFixture {
    pub authority: AuthorityLoop<MockTransport>,
    pub peers: MockPeers,
}

impl AuthorityFixture {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("rally_session_net=debug,rally_session_core=debug")
            .with_test_writer()
            .try_init();

        let (transport, peers) = create_mock_network();
        Self {
            authority: AuthorityLoop::new(transport, config),
            peers,
        }
    }

    /// Connect and register a member, then clear its inbox
    pub fn join(&mut self, raw: u64, name: &str) -> MemberId {
        let member = self.peers.connect(raw);
        self.peers.send(
            member,
            ClientMessage::Register {
                display_name: name.to_string(),
            },
        );
        self.authority.poll();
        member
    }

    pub fn clear_inboxes(&self, members: &[MemberId]) {
        for member in members {
            self.peers.take_frames(*member);
        }
    }
}

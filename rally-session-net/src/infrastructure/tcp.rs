use crate::application::ConnectionEvent;
use crate::infrastructure::connection_trait::PeerTransport;
use crate::infrastructure::error::{NetError, Result};
use crate::infrastructure::frame_reader::FrameReader;
use rally_session_core::MemberId;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Lowest id handed to a connection; 1 is the authority itself
const FIRST_PEER_ID: u64 = 2;

/// Events from the accept and reader tasks
enum TcpEvent {
    Accepted {
        member: MemberId,
        writer: mpsc::UnboundedSender<String>,
    },
    Line {
        member: MemberId,
        line: String,
    },
    Closed {
        member: MemberId,
    },
}

/// Authority transport over TCP
///
/// Each connection gets a reader and a writer task; every reader feeds one
/// channel, so `poll_events` sees all peers' events in a single order.
pub struct TcpTransport {
    local_addr: SocketAddr,
    events: mpsc::UnboundedReceiver<TcpEvent>,
    writers: HashMap<MemberId, mpsc::UnboundedSender<String>>,
}

impl TcpTransport {
    /// Bind and start accepting connections (must run inside a tokio runtime)
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| NetError::ConnectionFailed(format!("bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("📡 Listening on {}", local_addr);

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(accept_loop(listener, tx));

        Ok(Self {
            local_addr,
            events: rx,
            writers: HashMap::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl PeerTransport for TcpTransport {
    fn connected_peers(&self) -> Vec<MemberId> {
        let mut peers: Vec<_> = self.writers.keys().copied().collect();
        peers.sort();
        peers
    }

    fn send_to(&mut self, peer: MemberId, line: String) -> Result<()> {
        let writer = self
            .writers
            .get(&peer)
            .ok_or(NetError::PeerNotFound(peer))?;

        writer
            .send(line)
            .map_err(|_| NetError::SendFailed(format!("writer for {} closed", peer)))
    }

    fn poll_events(&mut self) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();

        while let Ok(event) = self.events.try_recv() {
            match event {
                TcpEvent::Accepted { member, writer } => {
                    self.writers.insert(member, writer);
                    events.push(ConnectionEvent::PeerConnected(member));
                }
                TcpEvent::Line { member, line } => {
                    events.push(ConnectionEvent::MessageReceived { from: member, line });
                }
                TcpEvent::Closed { member } => {
                    self.writers.remove(&member);
                    events.push(ConnectionEvent::PeerDisconnected(member));
                }
            }
        }

        events
    }
}

async fn accept_loop(listener: TcpListener, events: mpsc::UnboundedSender<TcpEvent>) {
    let mut next_id = FIRST_PEER_ID;

    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                continue;
            }
        };

        let member = MemberId::new(next_id);
        next_id += 1;
        tracing::info!("🟢 Accepted {} from {}", member, addr);

        if spawn_peer(stream, member, &events).is_err() {
            tracing::debug!("Transport dropped, stopping accept loop");
            break;
        }
    }
}

fn spawn_peer(
    stream: TcpStream,
    member: MemberId,
    events: &mpsc::UnboundedSender<TcpEvent>,
) -> std::result::Result<(), mpsc::error::SendError<TcpEvent>> {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("set_nodelay failed for {}: {}", member, e);
    }

    let (read_half, write_half) = stream.into_split();
    let (writer_tx, writer_rx) = mpsc::unbounded_channel();

    // Accepted goes out before the reader starts, so no frame can overtake it
    events.send(TcpEvent::Accepted {
        member,
        writer: writer_tx,
    })?;

    tokio::spawn(write_loop(write_half, writer_rx, member));
    tokio::spawn(read_loop(read_half, events.clone(), member));

    Ok(())
}

async fn read_loop(
    read_half: OwnedReadHalf,
    events: mpsc::UnboundedSender<TcpEvent>,
    member: MemberId,
) {
    let mut frames = FrameReader::new(read_half);

    loop {
        match frames.next_frame().await {
            Ok(Some(line)) => {
                if events.send(TcpEvent::Line { member, line }).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(NetError::MalformedFrame(reason)) => {
                tracing::warn!("Closing {}: {}", member, reason);
                break;
            }
            Err(e) => {
                tracing::debug!("Read from {} failed: {}", member, e);
                break;
            }
        }
    }

    tracing::info!("🔴 Connection {} closed", member);
    let _ = events.send(TcpEvent::Closed { member });
}

async fn write_loop(
    mut write_half: OwnedWriteHalf,
    mut lines: mpsc::UnboundedReceiver<String>,
    member: MemberId,
) {
    while let Some(line) = lines.recv().await {
        if let Err(e) = write_half.write_all(line.as_bytes()).await {
            tracing::debug!("Write to {} failed: {}", member, e);
            break;
        }
    }

    let _ = write_half.shutdown().await;
}

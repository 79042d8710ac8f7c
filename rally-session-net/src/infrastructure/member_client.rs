use crate::application::SessionConfig;
use crate::domain::SessionId;
use crate::infrastructure::error::{NetError, Result};
use crate::infrastructure::frame_reader::FrameReader;
use crate::infrastructure::message::{
    decode_line, encode_line, ClientMessage, MessageKind, WireMessage,
};
use rally_session_core::{MemberId, SessionCommand};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Member-side connection to an authority
pub struct MemberClient {
    member_id: MemberId,
    session_id: SessionId,
    frames: FrameReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    sequence: u64,
}

impl MemberClient {
    /// Dial the authority and wait for its `Hello`
    ///
    /// Both steps share `config.connect_timeout`.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        let addr = config.socket_addr();

        timeout(config.connect_timeout, Self::handshake(&addr))
            .await
            .map_err(|_| NetError::ConnectTimeout {
                addr: addr.clone(),
                secs: config.connect_timeout.as_secs(),
            })?
    }

    async fn handshake(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| NetError::ConnectionFailed(format!("{}: {}", addr, e)))?;
        let (read_half, writer) = stream.into_split();
        let mut frames = FrameReader::new(read_half);

        let line = frames
            .next_frame()
            .await?
            .ok_or_else(|| NetError::Handshake("connection closed before hello".to_string()))?;

        match decode_line(&line)?.kind {
            MessageKind::Hello {
                member_id,
                session_id,
            } => {
                tracing::info!("🤝 Joined session {} as {}", session_id, member_id);
                Ok(Self {
                    member_id,
                    session_id,
                    frames,
                    writer,
                    sequence: 0,
                })
            }
            other => Err(NetError::Handshake(format!(
                "expected hello, got {:?}",
                other
            ))),
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub async fn send(&mut self, request: ClientMessage) -> Result<()> {
        self.sequence += 1;
        let line = encode_line(&WireMessage::request(self.sequence, request))?;
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Next command from the authority, or `None` once it hangs up
    ///
    /// Cancel-safe: no frame is lost if the future is dropped.
    pub async fn next_command(&mut self) -> Result<Option<SessionCommand>> {
        while let Some(line) = self.frames.next_frame().await? {
            match decode_line(&line) {
                Ok(WireMessage {
                    kind: MessageKind::Command(command),
                    ..
                }) => return Ok(Some(command)),
                Ok(other) => {
                    tracing::warn!("Ignoring unexpected frame {:?}", other.kind);
                }
                Err(e) => {
                    tracing::warn!("Dropping malformed frame: {}", e);
                }
            }
        }

        Ok(None)
    }

    /// Close the write side; the authority sees a disconnect
    pub async fn leave(mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

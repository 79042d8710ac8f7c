use crate::infrastructure::error::{NetError, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// Longest frame accepted from a peer, newline excluded
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Newline-delimited frame reader with a length cap
///
/// Partial lines are kept between calls, so `next_frame` is cancel-safe.
pub struct FrameReader<R> {
    inner: BufReader<R>,
    pending: Vec<u8>,
    max_len: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_len(inner, MAX_FRAME_LEN)
    }

    pub fn with_max_len(inner: R, max_len: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: Vec::new(),
            max_len,
        }
    }

    /// Next frame without its line ending, `None` at end of stream
    ///
    /// A frame longer than the cap fails with `MalformedFrame`; the stream
    /// is then out of sync and should be closed.
    pub async fn next_frame(&mut self) -> Result<Option<String>> {
        loop {
            let room = (self.max_len + 1).saturating_sub(self.pending.len()) as u64;
            let read = (&mut self.inner)
                .take(room)
                .read_until(b'\n', &mut self.pending)
                .await?;

            if self.pending.last() == Some(&b'\n') {
                self.pending.pop();
                if self.pending.last() == Some(&b'\r') {
                    self.pending.pop();
                }
                return self.take_frame().map(Some);
            }

            if self.pending.len() > self.max_len {
                self.pending.clear();
                return Err(NetError::MalformedFrame(format!(
                    "frame exceeds {} bytes",
                    self.max_len
                )));
            }

            if read == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                // Last line had no terminator
                return self.take_frame().map(Some);
            }
        }
    }

    fn take_frame(&mut self) -> Result<String> {
        String::from_utf8(std::mem::take(&mut self.pending))
            .map_err(|_| NetError::MalformedFrame("frame is not UTF-8".to_string()))
    }
}

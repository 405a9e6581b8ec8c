//! Framing
//!
//! Splits the byte stream of one connection into CRLF-terminated lines.

use crate::buffer::Buffer;
use crate::error::{HashbaseError, Result};

/// Line terminator for requests and replies
pub const TERMINATOR: &[u8] = b"\r\n";

/// True when `bytes` holds a whole frame, i.e. ends with CRLF
pub fn is_complete_frame(bytes: &[u8]) -> bool {
    bytes.len() >= TERMINATOR.len() && bytes.ends_with(TERMINATOR)
}

/// Accumulates reads and hands out complete lines in arrival order
#[derive(Debug)]
pub struct FrameReader {
    /// Bytes received but not yet returned as a frame
    pending: Buffer,

    /// Prefix of `pending` already known to hold no terminator
    scanned: usize,

    /// Largest unterminated frame accepted before giving up
    max_frame_len: usize,
}

impl FrameReader {
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            pending: Buffer::empty(),
            scanned: 0,
            max_frame_len,
        }
    }

    /// Append freshly read bytes
    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        self.pending.append(bytes)
    }

    /// Pop the next complete line, terminator stripped
    ///
    /// Returns `Ok(None)` while the line is still partial, and a protocol
    /// error once a partial line outgrows the frame limit.
    pub fn next_frame(&mut self) -> Result<Option<Buffer>> {
        // A CR at the end of the scanned prefix may pair with a new LF.
        let from = self.scanned.saturating_sub(1);

        match find_terminator(&self.pending[from..]) {
            Some(offset) => {
                let end = from + offset;
                let frame = Buffer::new(&self.pending[..end]);

                let rest = end + TERMINATOR.len();
                if rest == self.pending.len() {
                    self.pending.clear();
                } else {
                    self.pending.range(rest as isize, -1);
                }
                self.scanned = 0;

                Ok(Some(frame))
            }
            None => {
                self.scanned = self.pending.len();
                if self.pending.len() > self.max_frame_len {
                    return Err(HashbaseError::Protocol(format!(
                        "frame exceeds {} bytes without a terminator",
                        self.max_frame_len
                    )));
                }
                Ok(None)
            }
        }
    }

    /// Bytes waiting for a terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes.windows(TERMINATOR.len()).position(|w| w == TERMINATOR)
}

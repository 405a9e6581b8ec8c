//! Reply definitions
//!
//! Represents the single line sent back for every request.

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::error::Result;

use super::TERMINATOR;

/// A reply to send to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Decimal status or count (`0` OK, `-1` error)
    Status(i64),

    /// Raw stored value
    Value(Bytes),

    /// Informational text
    Text(String),
}

impl Reply {
    pub const OK: Reply = Reply::Status(0);
    pub const ERR: Reply = Reply::Status(-1);

    /// Create an OK (`0`) reply
    pub fn ok() -> Self {
        Self::OK
    }

    /// Create an ERROR (`-1`) reply
    pub fn err() -> Self {
        Self::ERR
    }

    /// Create a count reply
    pub fn integer(n: i64) -> Self {
        Reply::Status(n)
    }

    pub fn is_err(&self) -> bool {
        *self == Self::ERR
    }

    /// Reply body without the terminator
    pub fn into_buffer(self) -> Buffer {
        match self {
            Reply::Status(n) => Buffer::from_i64(n),
            Reply::Value(bytes) => Buffer::from(bytes),
            Reply::Text(text) => Buffer::from(text.into_bytes()),
        }
    }

    /// Reply body followed by CRLF, ready for the socket
    pub fn encode(self) -> Result<Buffer> {
        let mut out = self.into_buffer();
        out.append(TERMINATOR)?;
        Ok(out)
    }
}

//! Escaping
//!
//! Inverse of the tokenizer's double-quote branch, used for debug output and
//! for building requests on the client side.

use crate::buffer::Buffer;
use crate::error::Result;

use super::TERMINATOR;

/// Render `bytes` as a double-quoted, escaped token
pub fn escape(bytes: &[u8]) -> Result<Buffer> {
    let mut out = Buffer::with_capacity(bytes.len() + 2);
    out.cat_repr(bytes)?;
    Ok(out)
}

/// Build a complete request line: every argument quoted, CRLF-terminated
pub fn encode_request<A: AsRef<[u8]>>(args: &[A]) -> Result<Buffer> {
    let mut line = Buffer::empty();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push(b' ')?;
        }
        line.cat_repr(arg.as_ref())?;
    }
    line.append(TERMINATOR)?;
    Ok(line)
}

//! Textual renderings: decimal integers and quoted escape form

use std::fmt::Write as _;

use super::Buffer;
use crate::error::Result;

impl Buffer {
    /// Render a signed integer in decimal
    ///
    /// Digits are produced directly into a stack array, skipping the
    /// formatting machinery on the reply hot path.
    pub fn from_i64(value: i64) -> Self {
        let mut digits = [0u8; 20];
        let mut pos = digits.len();
        let mut v = value.unsigned_abs();

        loop {
            pos -= 1;
            digits[pos] = b'0' + (v % 10) as u8;
            v /= 10;
            if v == 0 {
                break;
            }
        }

        let mut out = Buffer::with_capacity(digits.len() - pos + 1);
        if value < 0 {
            out.data.push(b'-');
        }
        out.data.extend_from_slice(&digits[pos..]);
        out
    }

    /// Append `bytes` as a double-quoted string with non-printable bytes
    /// escaped, in the form the tokenizer reads back
    pub fn cat_repr(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len() + 2)?;
        self.push(b'"')?;
        for &b in bytes {
            match escape_byte(b) {
                Escaped::Literal(c) => self.push(c)?,
                Escaped::Short(c) => self.append(&[b'\\', c])?,
                Escaped::Hex(hi, lo) => self.append(&[b'\\', b'x', hi, lo])?,
            }
        }
        self.push(b'"')
    }
}

enum Escaped {
    Literal(u8),
    Short(u8),
    Hex(u8, u8),
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn escape_byte(b: u8) -> Escaped {
    match b {
        b'\\' | b'"' => Escaped::Short(b),
        b'\n' => Escaped::Short(b'n'),
        b'\r' => Escaped::Short(b'r'),
        b'\t' => Escaped::Short(b't'),
        0x07 => Escaped::Short(b'a'),
        0x08 => Escaped::Short(b'b'),
        0x20..=0x7e => Escaped::Literal(b),
        _ => Escaped::Hex(HEX_DIGITS[(b >> 4) as usize], HEX_DIGITS[(b & 0x0f) as usize]),
    }
}

/// Quoted escape form into a `String` (for `Debug`)
pub(super) fn write_repr(out: &mut String, bytes: &[u8]) {
    out.push('"');
    for &b in bytes {
        match escape_byte(b) {
            Escaped::Literal(c) => out.push(c as char),
            Escaped::Short(c) => {
                out.push('\\');
                out.push(c as char);
            }
            Escaped::Hex(hi, lo) => {
                let _ = write!(out, "\\x{}{}", hi as char, lo as char);
            }
        }
    }
    out.push('"');
}

//! Tokenizer
//!
//! Splits one request line into arguments with shell-like quoting:
//!
//! ```text
//! set greeting "hello\r\n" and 'it\'s' "\xff\x00raw"
//! ```
//!
//! A quote may open anywhere inside a bare token (`ab"c d"` is the single
//! argument `abc d`), but a closing quote must be followed by whitespace or
//! the end of the line. Any failure discards the whole line.

use crate::buffer::Buffer;
use crate::error::{HashbaseError, Result};

/// Lexer state while building one token
#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Bare,
    Double,
    Single,
}

/// Split a line into tokens
///
/// An empty or all-whitespace line yields no tokens.
pub fn split_args(line: &[u8]) -> Result<Vec<Buffer>> {
    let mut args = Vec::new();
    let mut p = 0;

    loop {
        while p < line.len() && is_space(line[p]) {
            p += 1;
        }
        if p == line.len() {
            return Ok(args);
        }

        let (token, next) = read_token(line, p)?;
        args.push(token);
        p = next;
    }
}

/// Read the token starting at `p`; returns it and the index after it
fn read_token(line: &[u8], mut p: usize) -> Result<(Buffer, usize)> {
    let at = |i: usize| line.get(i).copied();
    let mut current = Buffer::empty();
    let mut state = State::Bare;

    loop {
        match state {
            State::Bare => match at(p) {
                None => return Ok((current, p)),
                Some(c) if is_space(c) => return Ok((current, p + 1)),
                Some(b'"') => {
                    state = State::Double;
                    p += 1;
                }
                Some(b'\'') => {
                    state = State::Single;
                    p += 1;
                }
                Some(c) => {
                    current.push(c)?;
                    p += 1;
                }
            },

            State::Double => match at(p) {
                None => return Err(unbalanced()),
                Some(b'\\') if at(p + 1) == Some(b'x') => {
                    match (at(p + 2).and_then(hex_value), at(p + 3).and_then(hex_value)) {
                        (Some(hi), Some(lo)) => {
                            current.push(hi * 16 + lo)?;
                            p += 4;
                        }
                        _ => {
                            current.push(b'x')?;
                            p += 2;
                        }
                    }
                }
                Some(b'\\') if at(p + 1).is_some() => {
                    let decoded = match line[p + 1] {
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'b' => 0x08,
                        b'a' => 0x07,
                        other => other,
                    };
                    current.push(decoded)?;
                    p += 2;
                }
                Some(b'"') => return close_quote(line, p, current),
                Some(c) => {
                    current.push(c)?;
                    p += 1;
                }
            },

            State::Single => match at(p) {
                None => return Err(unbalanced()),
                Some(b'\\') if at(p + 1) == Some(b'\'') => {
                    current.push(b'\'')?;
                    p += 2;
                }
                Some(b'\'') => return close_quote(line, p, current),
                Some(c) => {
                    current.push(c)?;
                    p += 1;
                }
            },
        }
    }
}

/// Finish a quoted token whose closing quote sits at `p`
fn close_quote(line: &[u8], p: usize, token: Buffer) -> Result<(Buffer, usize)> {
    match line.get(p + 1) {
        Some(&c) if !is_space(c) => Err(HashbaseError::Protocol(
            "closing quote must be followed by a space".to_string(),
        )),
        _ => Ok((token, p + 1)),
    }
}

fn unbalanced() -> HashbaseError {
    HashbaseError::Protocol("unbalanced quotes in request".to_string())
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

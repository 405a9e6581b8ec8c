//! Blocking client
//!
//! Speaks the line protocol over a single TCP connection: one request line
//! out, one reply line back.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{HashbaseError, Result};
use crate::protocol::{encode_request, is_complete_frame, TERMINATOR};

/// Client connection to a hashbase server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to `addr`
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Bound how long a reply may take (`None` waits forever)
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// Send a raw line (CRLF appended) and return the reply line
    pub fn send_line(&mut self, line: &[u8]) -> Result<Vec<u8>> {
        self.writer.write_all(line)?;
        self.writer.write_all(TERMINATOR)?;
        self.writer.flush()?;
        self.read_reply()
    }

    /// Send `args` as quoted tokens and return the reply line
    pub fn request<A: AsRef<[u8]>>(&mut self, args: &[A]) -> Result<Vec<u8>> {
        let line = encode_request(args)?;
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.read_reply()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Server banner
    pub fn info(&mut self) -> Result<String> {
        let reply = self.request(&["inf"])?;
        Ok(String::from_utf8_lossy(&reply).into_owned())
    }

    /// Store a value; `false` when the server refused (store full)
    ///
    /// Values containing CRLF are refused with a protocol error: `get`
    /// replies with the raw bytes, so such a value would read back as two
    /// reply lines.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        if value.windows(TERMINATOR.len()).any(|w| w == TERMINATOR) {
            return Err(HashbaseError::Protocol(
                "value contains CRLF and cannot be read back".to_string(),
            ));
        }
        let reply = self.request(&[b"set".as_slice(), key, value])?;
        Ok(parse_status(&reply)? == 0)
    }

    /// Fetch a value; `None` when the key is absent
    ///
    /// The protocol cannot tell a missing key from a stored `-1`.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let reply = self.request(&[b"get".as_slice(), key])?;
        if reply == b"-1" {
            Ok(None)
        } else {
            Ok(Some(reply))
        }
    }

    /// Delete a key (absent keys are fine)
    pub fn del(&mut self, key: &[u8]) -> Result<()> {
        let reply = self.request(&[b"del".as_slice(), key])?;
        expect_ok(&reply)
    }

    /// Number of stored keys
    pub fn len(&mut self) -> Result<usize> {
        let reply = self.request(&["len"])?;
        let n = parse_status(&reply)?;
        usize::try_from(n)
            .map_err(|_| HashbaseError::Protocol(format!("negative length reply: {}", n)))
    }

    /// Drop every key
    pub fn clear(&mut self) -> Result<()> {
        let reply = self.request(&["clr"])?;
        expect_ok(&reply)
    }

    /// Read until a CRLF-terminated line is complete
    fn read_reply(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            let n = self.reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                return Err(HashbaseError::Network(
                    "server closed the connection".to_string(),
                ));
            }
            if is_complete_frame(&line) {
                line.truncate(line.len() - TERMINATOR.len());
                return Ok(line);
            }
        }
    }
}

fn parse_status(reply: &[u8]) -> Result<i64> {
    std::str::from_utf8(reply)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            HashbaseError::Protocol(format!(
                "expected a status reply, got {:?}",
                String::from_utf8_lossy(reply)
            ))
        })
}

fn expect_ok(reply: &[u8]) -> Result<()> {
    match parse_status(reply)? {
        0 => Ok(()),
        code => Err(HashbaseError::Command(format!("server replied {}", code))),
    }
}

//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{self, BufWriter, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::context::Context;
use crate::error::{HashbaseError, Result};
use crate::protocol::{FrameReader, Reply};

use super::ShutdownHandle;

/// Read timeout used as a tick to notice shutdown and idle expiry
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (raw; reads go through a fixed transfer window)
    reader: TcpStream,

    /// TCP stream writer (buffered, flushed once per batch of replies)
    writer: BufWriter<TcpStream>,

    /// Shared server state
    context: Context,

    /// Server-wide stop signal
    shutdown: ShutdownHandle,

    /// Bytes received but not yet framed
    frames: FrameReader,

    /// Connection number for logging
    id: u64,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up the read/write halves and configures timeouts
    pub fn new(
        stream: TcpStream,
        context: Context,
        shutdown: ShutdownHandle,
        id: u64,
    ) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        stream.set_read_timeout(Some(POLL_INTERVAL))?;
        let write_ms = context.config().write_timeout_ms;
        if write_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        let reader = stream.try_clone()?;
        let frames = FrameReader::new(context.config().max_frame_len);

        Ok(Self {
            reader,
            writer: BufWriter::new(stream),
            context,
            shutdown,
            frames,
            id,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns `Ok` when the peer hangs up, the connection idles out or the
    /// server shuts down; `Err` on I/O or framing failures.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection {} established from {}", self.id, self.peer_addr);

        let mut window = vec![0u8; self.context.config().read_buffer_size];
        let idle_limit = match self.context.config().read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let mut last_activity = Instant::now();

        loop {
            if self.shutdown.is_shutdown() {
                tracing::debug!("Closing connection {} for shutdown", self.id);
                return Ok(());
            }

            let n = match self.reader.read(&mut window) {
                Ok(0) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Ok(n) => n,
                Err(ref e) if is_timeout(e) => {
                    if idle_limit.is_some_and(|limit| last_activity.elapsed() >= limit) {
                        tracing::debug!("Connection {} idle, closing", self.id);
                        return Ok(());
                    }
                    continue;
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(ref e) if is_disconnect(e) => {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            };

            last_activity = Instant::now();
            tracing::trace!("Read {} bytes from {}", n, self.peer_addr);

            if let Err(e) = self.frames.feed(&window[..n]).and_then(|_| self.drain_frames()) {
                if let HashbaseError::Io(ref io_err) = e {
                    if is_disconnect(io_err) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Closing connection {} ({}): {}", self.id, self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute every complete frame buffered so far, in order
    fn drain_frames(&mut self) -> Result<()> {
        loop {
            match self.frames.next_frame() {
                Ok(Some(line)) => {
                    tracing::trace!("Request from {}: {:?}", self.peer_addr, line);
                    let reply = self.context.execute(&line);
                    self.queue_reply(reply)?;
                }
                Ok(None) => break,
                Err(e) => {
                    // Answer the oversized frame before hanging up
                    let _ = self.queue_reply(Reply::ERR);
                    let _ = self.writer.flush();
                    return Err(e);
                }
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Queue one reply line
    fn queue_reply(&mut self, reply: Reply) -> Result<()> {
        let bytes = reply.encode()?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }
}

fn is_timeout(e: &io::Error) -> bool {
    // Windows reports TimedOut where Unix reports WouldBlock
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}

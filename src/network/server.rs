//! TCP Server
//!
//! Accepts connections and hands each one to its own worker thread.
//!
//! ## Accept Loop
//! The listener blocks in `accept`. Shutdown sets a flag and then opens one
//! throwaway connection to the listener so the blocked `accept` returns and
//! sees the flag.
//!
//! ## Connection Limit
//! A client accepted while `max_connections` workers are live is sent a
//! single `-1\r\n` and disconnected before it sends anything. That line
//! answers no request: a client that writes a request first will read it as
//! if it were the reply, then hit end of stream.

use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;
use socket2::{Domain, Protocol, Socket, Type};

use crate::context::Context;
use crate::error::{HashbaseError, Result};

use super::Connection;

/// Back-off after a failed accept (e.g. out of descriptors)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Bound on the connection that wakes a blocked accept
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Cloneable stop signal shared by the accept loop and every connection
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,

    /// Listener to poke so a blocked `accept` returns
    wake_addr: Option<SocketAddr>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn for_listener(local_addr: SocketAddr) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            wake_addr: Some(wake_target(local_addr)),
        }
    }

    /// Ask the server to stop accepting and wind down its connections
    pub fn shutdown(&self) {
        if self.flag.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(addr) = self.wake_addr {
            if let Err(e) = TcpStream::connect_timeout(&addr, WAKE_TIMEOUT) {
                tracing::warn!("Could not wake listener at {}: {}", addr, e);
            }
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for hashbase
pub struct Server {
    context: Context,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: ShutdownHandle,
    /// Live connection workers
    active: Arc<AtomicUsize>,
    next_id: u64,
}

impl Server {
    /// Create the listening socket
    ///
    /// Binds and listens with the configured backlog; failure here is fatal
    /// for the process.
    pub fn bind(context: Context) -> Result<Self> {
        let config = context.config();
        let listen_addr = config.listen_addr();

        let addr = listen_addr.to_socket_addrs()?.next().ok_or_else(|| {
            HashbaseError::Network(format!("could not resolve {}", listen_addr))
        })?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into()).map_err(|e| {
            HashbaseError::Network(format!("could not bind {}: {}", addr, e))
        })?;
        socket.listen(config.backlog)?;

        let listener: TcpListener = socket.into();
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "Listening on {} (backlog {}, {} slots)",
            local_addr,
            config.backlog,
            config.store_capacity
        );

        Ok(Self {
            context,
            listener,
            local_addr,
            shutdown: ShutdownHandle::for_listener(local_addr),
            active: Arc::new(AtomicUsize::new(0)),
            next_id: 1,
        })
    }

    /// Address actually bound (useful when the configured port is 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops [`Server::run`] from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Accept connections until shutdown (blocking)
    ///
    /// On shutdown, stops accepting, waits for every worker to finish its
    /// current frame and close its socket, then closes the listener.
    pub fn run(mut self) -> Result<()> {
        let workers = WaitGroup::new();

        loop {
            match self.listener.accept() {
                // Also catches the wake-up connection from `shutdown`
                Ok(_) if self.shutdown.is_shutdown() => break,
                Ok((stream, peer)) => self.spawn_connection(stream, peer, &workers),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) if self.shutdown.is_shutdown() => break,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    thread::sleep(ACCEPT_ERROR_BACKOFF);
                }
            }
        }

        tracing::info!(
            "Shutting down, waiting for {} connection(s)",
            self.active_connections()
        );
        workers.wait();
        tracing::info!("All connections closed");

        Ok(())
    }

    /// Start a worker thread for an accepted socket
    fn spawn_connection(&mut self, stream: TcpStream, peer: SocketAddr, workers: &WaitGroup) {
        let limit = self.context.config().max_connections;
        if self.active_connections() >= limit {
            tracing::warn!("Connection limit ({}) reached, rejecting {}", limit, peer);
            reject(stream);
            return;
        }

        let id = self.next_id;
        self.next_id += 1;

        let context = self.context.clone();
        let shutdown = self.shutdown.clone();
        let active = ActiveGuard::enter(&self.active);
        let done = workers.clone();

        tracing::debug!("Accepted connection {} from {}", id, peer);

        let spawned = thread::Builder::new()
            .name(format!("hb-conn-{}", id))
            .spawn(move || {
                let _active = active;
                let _done = done;

                match Connection::new(stream, context, shutdown, id) {
                    Ok(mut connection) => {
                        if let Err(e) = connection.handle() {
                            tracing::warn!("Connection {} ({}) ended with error: {}", id, peer, e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to set up connection {} from {}: {}", id, peer, e);
                    }
                }

                tracing::debug!("Connection {} closed", id);
            });

        if let Err(e) = spawned {
            tracing::error!("Could not spawn worker for {}: {}", peer, e);
        }
    }
}

/// Counts a live worker for as long as it is held
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Send an over-limit client one unsolicited error line and hang up
fn reject(mut stream: TcpStream) {
    let _ = stream.write_all(b"-1\r\n");
}

/// Address a local client can reach the listener on
fn wake_target(mut addr: SocketAddr) -> SocketAddr {
    if addr.ip().is_unspecified() {
        match addr {
            SocketAddr::V4(_) => addr.set_ip(Ipv4Addr::LOCALHOST.into()),
            SocketAddr::V6(_) => addr.set_ip(Ipv6Addr::LOCALHOST.into()),
        }
    }
    addr
}

//! Network Module
//!
//! TCP listener and per-client connection handling.
//!
//! ## Architecture
//! - Single accept loop, blocking in `accept`, woken on shutdown
//! - One named worker thread per live connection
//! - Requests executed against the shared `Context`
//! - Cooperative shutdown through a `ShutdownHandle`

mod connection;
mod server;

pub use connection::Connection;
pub use server::{Server, ShutdownHandle};

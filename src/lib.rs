//! # hashbase
//!
//! A small in-memory key-value server with:
//! - Binary-safe, amortized-growth byte buffers for keys, values and wire data
//! - A fixed-capacity slot table guarded by a single reader/writer lock
//! - A line-oriented TCP protocol with shell-like quoting
//! - One worker thread per client connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (accept loop, one thread per client)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Protocol Codec                             │
//! │          (CRLF framing → quoted-token splitting)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  tokens
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Command Table                               │
//! │            (inf / set / get / del / len / clr)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌──────────────┐
//!               │    Store     │
//!               │   (RwLock)   │
//!               └──────────────┘
//! ```
//!
//! Nothing is persisted: the store lives and dies with the process.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod buffer;
pub mod store;
pub mod protocol;
pub mod command;
pub mod context;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use buffer::Buffer;
pub use client::Client;
pub use command::CommandTable;
pub use config::Config;
pub use context::Context;
pub use error::{HashbaseError, Result};
pub use network::{Server, ShutdownHandle};
pub use protocol::Reply;
pub use store::{KeyValueStore, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hashbase
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

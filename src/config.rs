//! Configuration for hashbase
//!
//! Centralized configuration with sensible defaults.

use crate::error::{HashbaseError, Result};

/// Main configuration for a hashbase instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Interface to bind
    pub host: String,

    /// TCP listen port (0 lets the OS pick one)
    pub port: u16,

    /// Pending-connection queue length passed to listen(2)
    pub backlog: i32,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Idle timeout for a connection (milliseconds, 0 = never)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = never)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Size of the per-read transfer window (bytes)
    pub read_buffer_size: usize,

    /// Largest unterminated frame a connection may accumulate (bytes)
    pub max_frame_len: usize,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Number of slots in the key-value table
    pub store_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
            backlog: 256,
            max_connections: 1024,
            read_timeout_ms: 300_000,
            write_timeout_ms: 5000,
            read_buffer_size: 512,
            max_frame_len: 16 * 1024 * 1024, // 16 MB
            store_capacity: 512,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string for binding
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.store_capacity == 0 {
            return Err(HashbaseError::Config(
                "store capacity must be at least 1 slot".to_string(),
            ));
        }
        if self.read_buffer_size == 0 {
            return Err(HashbaseError::Config(
                "read buffer size must be non-zero".to_string(),
            ));
        }
        if self.backlog <= 0 {
            return Err(HashbaseError::Config(format!(
                "backlog must be positive, got {}",
                self.backlog
            )));
        }
        if self.max_frame_len < self.read_buffer_size {
            return Err(HashbaseError::Config(format!(
                "max frame length ({}) is smaller than the read buffer ({})",
                self.max_frame_len, self.read_buffer_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the interface to bind
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the listen backlog
    pub fn backlog(mut self, backlog: i32) -> Self {
        self.config.backlog = backlog;
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the idle timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the per-read transfer window (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the maximum unterminated frame length (in bytes)
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Set the number of table slots
    pub fn store_capacity(mut self, slots: usize) -> Self {
        self.config.store_capacity = slots;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

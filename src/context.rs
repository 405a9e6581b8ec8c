//! Application Context
//!
//! Everything a connection needs, built once at startup and handed to
//! every worker.
//!
//! ## Ownership
//! - `store`: shared by reference (`Arc`) across all connections
//! - `commands`: immutable after startup, shared the same way
//! - per-connection state (socket, frame buffer) lives in the connection

use std::sync::Arc;

use crate::command::CommandTable;
use crate::config::Config;
use crate::error::Result;
use crate::protocol::Reply;
use crate::store::Store;

/// Shared server state
#[derive(Clone)]
pub struct Context {
    config: Arc<Config>,
    store: Arc<Store>,
    commands: Arc<CommandTable>,
}

impl Context {
    /// Validate `config` and build the store and built-in command table
    pub fn new(config: Config) -> Result<Self> {
        Self::with_commands(config, CommandTable::builtin())
    }

    /// Like [`Context::new`] with a caller-supplied command table
    pub fn with_commands(config: Config, commands: CommandTable) -> Result<Self> {
        config.validate()?;

        let store = Store::new(config.store_capacity);

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            commands: Arc::new(commands),
        })
    }

    /// Run one request line against the store
    pub fn execute(&self, line: &[u8]) -> Reply {
        self.commands.execute_line(line, self.store.as_ref())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }
}

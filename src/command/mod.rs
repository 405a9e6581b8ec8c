//! Command Module
//!
//! Routes a tokenized request to its handler.
//!
//! ## Dispatch
//! - Ordered table, linear scan, first exact (case-sensitive) name match wins
//! - Unknown names, too few arguments and handler failures all reply `-1`
//! - Extra trailing arguments are ignored
//!
//! Handlers only see the [`KeyValueStore`] capability, never the concrete
//! store type.

mod builtin;

use std::fmt;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::protocol::{split_args, Reply};
use crate::store::KeyValueStore;

/// Handler signature: arguments after the command name, plus the store
pub type Handler = Box<dyn Fn(&[Buffer], &dyn KeyValueStore) -> Result<Reply> + Send + Sync>;

/// A registered command
pub struct CommandSpec {
    name: String,
    min_args: usize,
    handler: Handler,
}

impl CommandSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments required after the name
    pub fn min_args(&self) -> usize {
        self.min_args
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .finish_non_exhaustive()
    }
}

/// Static, ordered command table
#[derive(Debug, Default)]
pub struct CommandTable {
    commands: Vec<CommandSpec>,
}

impl CommandTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in commands: `inf set get del len clr`
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register("inf", 0, builtin::inf);
        table.register("set", 2, builtin::set);
        table.register("get", 1, builtin::get);
        table.register("del", 1, builtin::del);
        table.register("len", 0, builtin::len);
        table.register("clr", 0, builtin::clr);
        table
    }

    /// Append a command; an earlier entry with the same name shadows it
    pub fn register<F>(&mut self, name: impl Into<String>, min_args: usize, handler: F)
    where
        F: Fn(&[Buffer], &dyn KeyValueStore) -> Result<Reply> + Send + Sync + 'static,
    {
        self.commands.push(CommandSpec {
            name: name.into(),
            min_args,
            handler: Box::new(handler),
        });
    }

    /// Find the first command whose name equals `name` exactly
    pub fn lookup(&self, name: &[u8]) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name.as_bytes() == name)
    }

    /// Registered names in dispatch order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }

    /// Run a tokenized request
    pub fn dispatch(&self, tokens: &[Buffer], store: &dyn KeyValueStore) -> Reply {
        let Some((name, args)) = tokens.split_first() else {
            tracing::debug!("Empty request");
            return Reply::ERR;
        };

        let Some(command) = self.lookup(name) else {
            tracing::debug!("Unknown command {:?}", name);
            return Reply::ERR;
        };

        if args.len() < command.min_args {
            tracing::debug!(
                "{}: expected {} argument(s), got {}",
                command.name,
                command.min_args,
                args.len()
            );
            return Reply::ERR;
        }

        tracing::trace!("Dispatching {} with {} argument(s)", command.name, args.len());

        match (command.handler)(args, store) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!("{} failed: {}", command.name, e);
                Reply::ERR
            }
        }
    }

    /// Tokenize and run one request line (terminator already stripped)
    pub fn execute_line(&self, line: &[u8], store: &dyn KeyValueStore) -> Reply {
        match split_args(line) {
            Ok(tokens) => self.dispatch(&tokens, store),
            Err(e) => {
                tracing::debug!("Rejected request: {}", e);
                Reply::ERR
            }
        }
    }
}

//! Store Module
//!
//! The shared key-value table every connection reads and writes.
//!
//! ## Responsibilities
//! - Fixed number of slots; inserting a new key into a full table fails
//! - At most one slot per key, `len()` always equals the occupied slots
//! - Safe concurrent access from many connection threads
//!
//! ## Concurrency
//! A single `parking_lot::RwLock` guards the whole table. Lookups, `len`
//! and iteration share the read lock; `put`, `remove`, `clear` take the
//! write lock. Every operation holds its guard for its full duration and
//! releases it on scope exit.

mod table;

pub use table::{HashTable, Iter};

use std::ops::ControlFlow;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{HashbaseError, Result};

/// Narrow capability interface the command handlers work against
pub trait KeyValueStore: Send + Sync {
    /// Insert or overwrite; `StoreFull` when a new key has no slot left
    fn put(&self, key: &[u8], value: Bytes) -> Result<()>;

    /// Fetch a value; `KeyNotFound` when absent
    fn get(&self, key: &[u8]) -> Result<Bytes>;

    /// Delete a key; `KeyNotFound` when absent
    fn remove(&self, key: &[u8]) -> Result<()>;

    /// Number of stored keys
    fn len(&self) -> usize;

    /// Drop every entry
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe store shared by reference across connections
pub struct Store {
    table: RwLock<HashTable>,
}

impl Store {
    /// Create a store with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            table: RwLock::new(HashTable::new(capacity)),
        }
    }

    /// Total slots
    pub fn capacity(&self) -> usize {
        self.table.read().capacity()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.table.read().contains(key)
    }

    /// Remove and return an arbitrary entry
    pub fn take_any(&self) -> Option<(Vec<u8>, Bytes)> {
        self.table.write().take_any()
    }

    /// Visit every entry under the read lock until the visitor breaks
    ///
    /// The visitor only sees borrowed data and must not block for long:
    /// writers wait until it returns.
    pub fn iterate<F>(&self, visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&[u8], &Bytes) -> ControlFlow<()>,
    {
        self.table.read().iterate(visitor)
    }
}

impl KeyValueStore for Store {
    fn put(&self, key: &[u8], value: Bytes) -> Result<()> {
        let mut table = self.table.write();
        table.put(key, value).map(|_| ())
    }

    fn get(&self, key: &[u8]) -> Result<Bytes> {
        let table = self.table.read();
        table.get(key).cloned().ok_or(HashbaseError::KeyNotFound)
    }

    fn remove(&self, key: &[u8]) -> Result<()> {
        let mut table = self.table.write();
        table
            .remove(key)
            .map(|_| ())
            .ok_or(HashbaseError::KeyNotFound)
    }

    fn len(&self) -> usize {
        self.table.read().len()
    }

    fn clear(&self) {
        self.table.write().clear();
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(crate::config::Config::default().store_capacity)
    }
}

//! Fixed-capacity slot table
//!
//! Open addressing with linear probing. Removed entries leave a tombstone so
//! probe chains stay intact; a put reuses the first tombstone on its path
//! once it has confirmed the key is absent.

use std::mem;
use std::ops::ControlFlow;

use bytes::Bytes;

use crate::error::{HashbaseError, Result};

/// One storage unit of the table
#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Empty,
    Deleted,
    Occupied { key: Vec<u8>, value: Bytes },
}

/// Outcome of walking a key's probe sequence
enum Probe {
    /// Key lives in this slot
    Found(usize),
    /// Key is absent; first reusable slot on the path, if any
    Vacant(Option<usize>),
}

/// Single-threaded key-value table with `capacity` slots
///
/// Not synchronized; see [`Store`](super::Store) for the shared wrapper.
#[derive(Debug, Clone)]
pub struct HashTable {
    slots: Vec<Slot>,
    /// Occupied slots
    size: usize,
    /// Tombstoned slots
    deleted: usize,
}

impl HashTable {
    /// Create a table with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![Slot::Empty; capacity],
            size: 0,
            deleted: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert or overwrite
    ///
    /// Returns the previous value when the key already existed. Fails with
    /// `StoreFull` only when the key is new and every slot is occupied.
    pub fn put(&mut self, key: &[u8], value: Bytes) -> Result<Option<Bytes>> {
        match self.probe(key) {
            Probe::Found(idx) => match &mut self.slots[idx] {
                Slot::Occupied { value: old, .. } => Ok(Some(mem::replace(old, value))),
                _ => unreachable!("probe reported a non-occupied slot as found"),
            },
            Probe::Vacant(Some(idx)) if self.size < self.slots.len() => {
                if matches!(self.slots[idx], Slot::Deleted) {
                    self.deleted -= 1;
                }
                self.slots[idx] = Slot::Occupied {
                    key: key.to_vec(),
                    value,
                };
                self.size += 1;
                Ok(None)
            }
            Probe::Vacant(_) => Err(HashbaseError::StoreFull {
                capacity: self.slots.len(),
            }),
        }
    }

    /// Look up a key
    pub fn get(&self, key: &[u8]) -> Option<&Bytes> {
        match self.probe(key) {
            Probe::Found(idx) => match &self.slots[idx] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Remove a key, returning its value if it was present
    pub fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        match self.probe(key) {
            Probe::Found(idx) => Some(self.vacate(idx).1),
            Probe::Vacant(_) => None,
        }
    }

    /// Remove and return some entry, or `None` when empty
    pub fn take_any(&mut self) -> Option<(Vec<u8>, Bytes)> {
        let idx = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Slot::Occupied { .. }))?;
        Some(self.vacate(idx))
    }

    /// Drop every entry; capacity is unchanged
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.size = 0;
        self.deleted = 0;
    }

    /// Visit every entry in slot order until the visitor breaks
    ///
    /// Returns `Break` if the visitor stopped early.
    pub fn iterate<F>(&self, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&[u8], &Bytes) -> ControlFlow<()>,
    {
        for (key, value) in self.iter() {
            visitor(key, value)?;
        }
        ControlFlow::Continue(())
    }

    /// Iterator over `(key, value)` pairs in slot order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn home_slot(&self, key: &[u8]) -> usize {
        mix(crc32fast::hash(key)) as usize % self.slots.len()
    }

    fn probe(&self, key: &[u8]) -> Probe {
        let capacity = self.slots.len();
        let mut idx = self.home_slot(key);
        let mut first_free = None;

        for _ in 0..capacity {
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_free.or(Some(idx))),
                Slot::Deleted => {
                    first_free.get_or_insert(idx);
                }
                Slot::Occupied { key: k, .. } if k.as_slice() == key => {
                    return Probe::Found(idx);
                }
                Slot::Occupied { .. } => {}
            }
            idx = (idx + 1) % capacity;
        }

        Probe::Vacant(first_free)
    }

    /// Tombstone an occupied slot and hand back its entry
    fn vacate(&mut self, idx: usize) -> (Vec<u8>, Bytes) {
        let entry = match mem::replace(&mut self.slots[idx], Slot::Deleted) {
            Slot::Occupied { key, value } => (key, value),
            _ => unreachable!("vacate called on a non-occupied slot"),
        };
        self.size -= 1;
        self.deleted += 1;

        if self.size == 0 {
            self.clear();
        } else if self.deleted > self.slots.len() / 2 {
            self.rebuild();
        }
        entry
    }

    /// Rehash live entries into fresh slots, dropping all tombstones
    fn rebuild(&mut self) {
        tracing::trace!(
            "Rebuilding table: {} live, {} tombstones",
            self.size,
            self.deleted
        );

        let capacity = self.slots.len();
        let old = mem::replace(&mut self.slots, vec![Slot::Empty; capacity]);
        self.deleted = 0;

        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                let mut idx = self.home_slot(&key);
                while !matches!(self.slots[idx], Slot::Empty) {
                    idx = (idx + 1) % capacity;
                }
                self.slots[idx] = Slot::Occupied { key, value };
            }
        }
    }
}

/// Spread CRC bits over the whole word before reducing modulo capacity
fn mix(mut h: u32) -> u32 {
    h = h.wrapping_add(h << 12);
    h ^= h >> 22;
    h = h.wrapping_add(h << 4);
    h ^= h >> 9;
    h = h.wrapping_add(h << 10);
    h ^= h >> 2;
    h = h.wrapping_add(h << 7);
    h ^= h >> 12;
    (h >> 3).wrapping_mul(2_654_435_761)
}

/// Borrowing iterator over occupied slots
pub struct Iter<'a> {
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a Bytes);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                return Some((key.as_slice(), value));
            }
        }
        None
    }
}

//! Buffer Module
//!
//! Binary-safe, growable byte sequence used for keys, values and wire
//! messages alike.
//!
//! ## Responsibilities
//! - Track logical length separately from allocated capacity
//! - Amortized O(1) appends via a doubling growth policy
//! - In-place editing (trim, range, case mapping) without reallocation
//! - Fallible growth: an allocation failure leaves the buffer untouched
//!
//! ## Growth Policy
//! ```text
//! needed = len + extra
//! needed <  1 MiB  →  capacity = needed * 2
//! needed >= 1 MiB  →  capacity = needed + 1 MiB
//! ```

mod edit;
mod repr;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use bytes::Bytes;

use crate::error::Result;

/// Growth switches from doubling to linear steps of this size
pub const PREALLOC: usize = 1024 * 1024;

/// Owned, growable byte buffer
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Create an empty buffer
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer holding a copy of `init`
    pub fn new(init: &[u8]) -> Self {
        Self {
            data: init.to_vec(),
        }
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Logical length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated bytes, always >= `len()`
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Spare bytes available before the next reallocation
    pub fn available(&self) -> usize {
        self.data.capacity() - self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Byte-wise ordering; a strict prefix sorts before the longer buffer
    pub fn compare(&self, other: &Buffer) -> Ordering {
        self.data.as_slice().cmp(other.data.as_slice())
    }

    // =========================================================================
    // Growth
    // =========================================================================

    /// Ensure at least `additional` spare bytes, growing per the policy above
    ///
    /// Leaves the buffer unchanged on failure.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if self.available() >= additional {
            return Ok(());
        }

        let len = self.data.len();
        let target = grown_capacity(len.saturating_add(additional));
        self.data.try_reserve_exact(target - len)?;
        Ok(())
    }

    /// Append raw bytes at the tail
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a single byte
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.reserve(1)?;
        self.data.push(byte);
        Ok(())
    }

    /// Append the content of another buffer
    pub fn concat(&mut self, other: &Buffer) -> Result<()> {
        self.append(other.as_slice())
    }

    /// Extend to `len` bytes, filling the new region with zeros
    ///
    /// No-op when the buffer is already at least that long.
    pub fn grow_zero(&mut self, len: usize) -> Result<()> {
        let current = self.data.len();
        if len <= current {
            return Ok(());
        }
        self.reserve(len - current)?;
        self.data.resize(len, 0);
        Ok(())
    }

    /// Replace the content with `bytes`, reusing the allocation when it fits
    pub fn copy_from(&mut self, bytes: &[u8]) -> Result<()> {
        if self.data.capacity() < bytes.len() {
            self.reserve(bytes.len() - self.data.len())?;
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Make the buffer empty while keeping its capacity
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Release spare capacity
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Freeze into a reference-counted, immutable byte string
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.data)
    }
}

/// Capacity to allocate when `needed` bytes must fit
fn grown_capacity(needed: usize) -> usize {
    if needed < PREALLOC {
        needed * 2
    } else {
        needed.saturating_add(PREALLOC)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Borrow<[u8]> for Buffer {
    fn borrow(&self) -> &[u8] {
        &self.data
    }
}

impl PartialOrd for Buffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Buffer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.data == other
    }
}

impl PartialEq<&[u8]> for Buffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.data == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Buffer {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.data.as_slice() == other.as_slice()
    }
}

impl PartialEq<&str> for Buffer {
    fn eq(&self, other: &&str) -> bool {
        self.data == other.as_bytes()
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self {
            data: Vec::from(bytes),
        }
    }
}

impl From<Buffer> for Bytes {
    fn from(buffer: Buffer) -> Self {
        buffer.into_bytes()
    }
}

impl fmt::Debug for Buffer {
    /// Quoted escape form; the closing quote terminates the content
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut quoted = String::with_capacity(self.data.len() + 2);
        repr::write_repr(&mut quoted, &self.data);
        write!(f, "Buffer({})", quoted)
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

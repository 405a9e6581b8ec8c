//! In-place editing, splitting and joining

use super::Buffer;
use crate::error::Result;

impl Buffer {
    /// Strip the longest prefix and suffix made only of bytes in `charset`
    ///
    /// ```
    /// use hashbase::Buffer;
    ///
    /// let mut buf = Buffer::from("AA.Hello.AA");
    /// buf.trim(b"A.");
    /// assert_eq!(buf, "Hello");
    /// ```
    pub fn trim(&mut self, charset: &[u8]) {
        let keep = |b: &u8| !charset.contains(b);

        let start = match self.data.iter().position(keep) {
            Some(i) => i,
            None => {
                self.data.clear();
                return;
            }
        };
        // A kept byte exists, so rposition finds one at or after `start`.
        let end = self.data.iter().rposition(keep).map_or(start, |i| i + 1);

        if start > 0 {
            self.data.copy_within(start..end, 0);
        }
        self.data.truncate(end - start);
    }

    /// Keep only the inclusive range `[start, end]`
    ///
    /// Negative indices count from the end (`-1` is the last byte). Indices
    /// are clamped to the content; an inverted range leaves the buffer empty.
    ///
    /// ```
    /// use hashbase::Buffer;
    ///
    /// let mut buf = Buffer::from("Hello World");
    /// buf.range(1, -1);
    /// assert_eq!(buf, "ello World");
    /// ```
    pub fn range(&mut self, start: isize, end: isize) {
        let len = self.data.len() as isize;
        if len == 0 {
            return;
        }

        let mut start = if start < 0 { (len + start).max(0) } else { start };
        let mut end = if end < 0 { (len + end).max(0) } else { end };

        let mut new_len = if start > end { 0 } else { end - start + 1 };
        if new_len != 0 {
            if start >= len {
                new_len = 0;
            } else if end >= len {
                end = len - 1;
                new_len = if start > end { 0 } else { end - start + 1 };
            }
        } else {
            start = 0;
        }

        let (start, new_len) = (start as usize, new_len as usize);
        if start > 0 && new_len > 0 {
            self.data.copy_within(start..start + new_len, 0);
        }
        self.data.truncate(new_len);
    }

    /// ASCII lower-case in place
    pub fn to_lowercase(&mut self) {
        self.data.make_ascii_lowercase();
    }

    /// ASCII upper-case in place
    pub fn to_uppercase(&mut self) {
        self.data.make_ascii_uppercase();
    }

    /// Substitute every byte found in `from` with the byte at the same
    /// position in `to`
    ///
    /// Only the first `min(from.len(), to.len())` pairs are used.
    pub fn map_bytes(&mut self, from: &[u8], to: &[u8]) {
        let pairs = from.len().min(to.len());
        for b in self.data.iter_mut() {
            if let Some(i) = from[..pairs].iter().position(|f| f == b) {
                *b = to[i];
            }
        }
    }

    /// Split on every occurrence of `sep`
    ///
    /// An empty buffer yields no parts; an empty separator yields the whole
    /// buffer as the only part. Adjacent separators produce empty parts.
    pub fn split(&self, sep: &[u8]) -> Vec<Buffer> {
        if self.data.is_empty() {
            return Vec::new();
        }
        if sep.is_empty() || sep.len() > self.data.len() {
            return vec![self.clone()];
        }

        let mut parts = Vec::new();
        let mut start = 0;
        let mut j = 0;
        while j + sep.len() <= self.data.len() {
            if &self.data[j..j + sep.len()] == sep {
                parts.push(Buffer::new(&self.data[start..j]));
                j += sep.len();
                start = j;
            } else {
                j += 1;
            }
        }
        parts.push(Buffer::new(&self.data[start..]));
        parts
    }

    /// Concatenate `parts`, placing `sep` between neighbours
    pub fn join<T: AsRef<[u8]>>(parts: &[T], sep: &[u8]) -> Result<Buffer> {
        let mut out = Buffer::empty();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                out.append(sep)?;
            }
            out.append(part.as_ref())?;
        }
        Ok(out)
    }
}

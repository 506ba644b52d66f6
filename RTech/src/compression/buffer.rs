//! Capacity-checked output buffer for the stream decoders

use crate::error::{Error, Result};

use super::DCMP_BUF_SIZE;

/// Owned scratch buffer that decoders write their output into.
///
/// The capacity is a hard limit, defaulting to (and capped at)
/// [`DCMP_BUF_SIZE`]. Writes past it fail with [`Error::BufferOverrun`]
/// instead of growing the buffer. A failed decode clears the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl Default for WorkingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkingBuffer {
    /// Create an empty buffer with the default 4 MiB capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DCMP_BUF_SIZE)
    }

    /// Create an empty buffer limited to `capacity` bytes (at most 4 MiB).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            capacity: capacity.min(DCMP_BUF_SIZE),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Take the decoded bytes out of the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Drop any decoded bytes, keeping the capacity limit.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Check that `additional` more bytes fit.
    pub(crate) fn ensure_room(&self, additional: usize) -> Result<()> {
        let requested = self.data.len() + additional;
        if requested > self.capacity {
            return Err(Error::BufferOverrun {
                requested,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Check that a token of `length` bytes fits both the capacity and the
    /// declared output length `total`. Capacity is checked first.
    pub(crate) fn ensure_token_fits(&self, length: usize, total: usize, offset: usize) -> Result<()> {
        self.ensure_room(length)?;
        if self.data.len() + length > total {
            return Err(Error::malformed(
                offset,
                format!(
                    "{length}-byte token overruns the declared length {total} at output {}",
                    self.data.len()
                ),
            ));
        }
        Ok(())
    }

    /// Reserve backing storage for an expected output size.
    pub(crate) fn prepare(&mut self, expected: usize) {
        self.data.clear();
        self.data.reserve(expected.min(self.capacity));
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<()> {
        self.ensure_room(1)?;
        self.data.push(byte);
        Ok(())
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn fill(&mut self, byte: u8, count: usize) -> Result<()> {
        self.ensure_room(count)?;
        self.data.resize(self.data.len() + count, byte);
        Ok(())
    }

    /// Repeat `length` bytes starting `distance` bytes back.
    ///
    /// Copies one byte at a time, so a distance shorter than the length
    /// repeats the pattern. The caller guarantees `1 <= distance <= len()`.
    pub(crate) fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        self.ensure_room(length)?;
        let start = self.data.len() - distance;
        for i in 0..length {
            let byte = self.data[start + i];
            self.data.push(byte);
        }
        Ok(())
    }
}

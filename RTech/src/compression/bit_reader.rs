//! LSB-first bit reader over a compressed span

use crate::error::{Error, Result};

/// Reads a byte slice as a little-endian bit stream.
///
/// Peeking past the end yields zero bits so table lookups near the tail of a
/// stream still work; consuming past the end is a [`Error::MalformedStream`].
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at `start_bit`.
    pub fn new(data: &'a [u8], start_bit: usize) -> Self {
        Self {
            data,
            position: start_bit,
        }
    }

    /// Absolute bit position of the next unread bit.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bits left before the end of the span.
    pub fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.position)
    }

    /// Look at the next `count` bits (at most 32) without consuming them.
    pub fn peek(&self, count: u32) -> u32 {
        debug_assert!(count <= 32);
        let byte = self.position >> 3;
        let shift = self.position & 7;
        let window = self
            .data
            .iter()
            .skip(byte)
            .take(5)
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (8 * i)));
        ((window >> shift) & ((1u64 << count) - 1)) as u32
    }

    /// Skip `count` bits.
    pub fn consume(&mut self, count: u32) -> Result<()> {
        let count = count as usize;
        if count > self.remaining() {
            return Err(Error::malformed(
                self.position,
                format!("input exhausted, {count} bits needed"),
            ));
        }
        self.position += count;
        Ok(())
    }

    /// Read and consume the next `count` bits.
    pub fn read(&mut self, count: u32) -> Result<u32> {
        let value = self.peek(count);
        self.consume(count)?;
        Ok(value)
    }
}

/// Bit writer mirroring [`BitReader`], used to build test streams.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
}

#[cfg(test)]
impl BitWriter {
    pub fn write(&mut self, value: u32, count: u32) {
        for k in 0..count {
            if self.bits % 8 == 0 {
                self.bytes.push(0);
            }
            let bit = ((value >> k) & 1) as u8;
            if let Some(last) = self.bytes.last_mut() {
                *last |= bit << (self.bits % 8);
            }
            self.bits += 1;
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

//! Pakfile stream decompression
//!
//! An rpak payload is an LZ stream coded with three small prefix codes:
//!
//! ```text
//! preamble   u32 LE   total decompressed length (header bytes included)
//! token      TOKEN code -> literal run, match, or their extended forms
//!   literal    n raw bytes, 8 bits each
//!   match      DISTANCE code (width w), then w raw bits; distance = bits + 1
//!   extended   flag bit; 0 -> 3-bit short slot, 1 -> LONG_SLOT code;
//!              length = 17 + slot base + slot extra bits
//! ```
//!
//! Bits are consumed least significant first. The container header that
//! precedes the payload is copied to the output unchanged.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::lut::{
    DISTANCE_TABLE, DecodeClass, EXTENDED_LENGTH_BIAS, LONG_LENGTH_SLOTS, LONG_SLOT_TABLE,
    SHORT_LENGTH_SLOTS, TOKEN_TABLE,
};

use super::bit_reader::BitReader;
use super::buffer::WorkingBuffer;
use super::{DCMP_BUF_SIZE, PAK_HEADER_SIZE};

// ============================================================================
// Parameter Block
// ============================================================================

/// Control state for one decompression.
///
/// Built by [`ParamBlock::init`] from the stream preamble; the cursors are
/// advanced as [`PakDecompressor::decompress`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBlock {
    /// Length of the compressed span handed to `init`.
    pub source_len: usize,
    /// Total output length, container header included.
    pub decompressed_len: usize,
    /// Byte offset of the stream preamble.
    pub payload_offset: usize,
    /// Leading bytes copied to the output verbatim.
    pub header_len: usize,
    /// Absolute input bit position of the next token.
    pub bit_position: usize,
    /// Bytes produced so far.
    pub output_position: usize,
}

impl ParamBlock {
    /// Validate a compressed span and read its preamble.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the span is empty, the header
    /// extends past the payload offset, the preamble is missing, or the
    /// declared length is zero, shorter than the header or above 4 MiB.
    pub fn init(data: &[u8], payload_offset: usize, header_len: usize) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::header("compressed span is empty"));
        }
        if header_len > payload_offset {
            return Err(Error::header(format!(
                "header length {header_len} exceeds payload offset {payload_offset}"
            )));
        }
        let preamble_end = payload_offset
            .checked_add(4)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::header(format!(
                    "no stream preamble at offset {payload_offset} in {} bytes",
                    data.len()
                ))
            })?;

        let decompressed_len = LittleEndian::read_u32(&data[payload_offset..preamble_end]) as usize;
        if decompressed_len == 0 {
            return Err(Error::header("declared decompressed length is zero"));
        }
        if decompressed_len < header_len {
            return Err(Error::header(format!(
                "declared length {decompressed_len} is shorter than the {header_len}-byte header"
            )));
        }
        if decompressed_len > DCMP_BUF_SIZE {
            return Err(Error::header(format!(
                "declared length {decompressed_len} exceeds the {DCMP_BUF_SIZE}-byte working buffer"
            )));
        }

        Ok(Self {
            source_len: data.len(),
            decompressed_len,
            payload_offset,
            header_len,
            bit_position: preamble_end * 8,
            output_position: 0,
        })
    }
}

// ============================================================================
// Decompressor
// ============================================================================

/// Decoder for one pakfile stream.
///
/// # Example
///
/// ```
/// use rtech::compression::{PakDecompressor, WorkingBuffer};
///
/// let stream = [
///     0x0C, 0x00, 0x00, 0x00, 0x67, 0x90, 0xD0, 0x10,
///     0x51, 0x91, 0xD1, 0x11, 0x12, 0x04, 0x00, 0x00,
/// ];
/// let mut decoder = PakDecompressor::init(&stream, 0, 0)?;
/// let mut out = WorkingBuffer::new();
/// decoder.decompress(stream.len(), &mut out)?;
/// assert_eq!(out.as_slice(), b"ABCDEFGHFGHF");
/// # Ok::<(), rtech::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PakDecompressor<'a> {
    data: &'a [u8],
    params: ParamBlock,
}

impl<'a> PakDecompressor<'a> {
    /// Prepare to decode `data`, whose stream preamble sits at
    /// `payload_offset` and whose first `header_len` bytes pass through.
    ///
    /// # Errors
    /// See [`ParamBlock::init`].
    pub fn init(data: &'a [u8], payload_offset: usize, header_len: usize) -> Result<Self> {
        let params = ParamBlock::init(data, payload_offset, header_len)?;
        Ok(Self { data, params })
    }

    /// Prepare to decode a whole rpak file: a 0x80-byte header followed
    /// directly by the stream.
    ///
    /// # Errors
    /// See [`ParamBlock::init`].
    pub fn for_rpak(data: &'a [u8]) -> Result<Self> {
        Self::init(data, PAK_HEADER_SIZE, PAK_HEADER_SIZE)
    }

    #[must_use]
    pub fn params(&self) -> &ParamBlock {
        &self.params
    }

    /// Total output length declared by the preamble.
    #[must_use]
    pub fn decompressed_len(&self) -> usize {
        self.params.decompressed_len
    }

    /// Decode the stream into `out`, treating only the first
    /// `compressed_len` input bytes as available.
    ///
    /// Returns the number of bytes in `out`, which equals the declared
    /// length. On failure `out` is left empty.
    ///
    /// # Errors
    /// - [`Error::BufferOverrun`] if the output would exceed `out`'s capacity
    /// - [`Error::MalformedStream`] if the stream is corrupt or truncated
    /// - [`Error::InvalidHeader`] if `compressed_len` cuts into the preamble
    pub fn decompress(&mut self, compressed_len: usize, out: &mut WorkingBuffer) -> Result<usize> {
        tracing::debug!(
            "pakfile stream: {} -> {} bytes",
            compressed_len,
            self.params.decompressed_len
        );

        let result = self.decode_tokens(compressed_len, out);
        match &result {
            Ok(len) => tracing::debug!("pakfile stream decoded {len} bytes"),
            Err(err) => {
                tracing::warn!("pakfile stream rejected: {err}");
                out.clear();
            }
        }
        result
    }

    fn decode_tokens(&mut self, compressed_len: usize, out: &mut WorkingBuffer) -> Result<usize> {
        let params = &mut self.params;
        let available = compressed_len.min(self.data.len());
        if available < params.payload_offset + 4 {
            return Err(Error::header(format!(
                "compressed length {compressed_len} ends before the stream preamble"
            )));
        }
        let data = &self.data[..available];
        let total = params.decompressed_len;

        out.prepare(total);
        out.extend_from_slice(&data[..params.header_len])?;

        let mut reader = BitReader::new(data, (params.payload_offset + 4) * 8);
        while out.len() < total {
            params.bit_position = reader.position();
            params.output_position = out.len();

            let token = TOKEN_TABLE[reader.peek(8) as usize];
            reader.consume(u32::from(token.code_bits))?;

            match token.class {
                DecodeClass::Literal(n) => copy_literal(&mut reader, usize::from(n), total, out)?,
                DecodeClass::LongLiteral => {
                    let length = read_extended_length(&mut reader)?;
                    copy_literal(&mut reader, length, total, out)?;
                }
                DecodeClass::Match(n) => copy_match(&mut reader, usize::from(n), total, out)?,
                DecodeClass::LongMatch => {
                    let length = read_extended_length(&mut reader)?;
                    copy_match(&mut reader, length, total, out)?;
                }
            }
        }

        params.bit_position = reader.position();
        params.output_position = out.len();
        Ok(out.len())
    }
}

fn copy_literal(
    reader: &mut BitReader<'_>,
    length: usize,
    total: usize,
    out: &mut WorkingBuffer,
) -> Result<()> {
    out.ensure_token_fits(length, total, reader.position())?;
    for _ in 0..length {
        out.push(reader.read(8)? as u8)?;
    }
    Ok(())
}

fn copy_match(
    reader: &mut BitReader<'_>,
    length: usize,
    total: usize,
    out: &mut WorkingBuffer,
) -> Result<()> {
    let distance = read_distance(reader)?;
    out.ensure_token_fits(length, total, reader.position())?;
    if distance > out.len() {
        return Err(Error::malformed(
            reader.position(),
            format!(
                "match distance {distance} reaches before the start of {} output bytes",
                out.len()
            ),
        ));
    }
    out.copy_match(distance, length)
}

fn read_distance(reader: &mut BitReader<'_>) -> Result<usize> {
    let entry = DISTANCE_TABLE[reader.peek(8) as usize];
    let Some(width) = entry.width else {
        return Err(Error::malformed(
            reader.position(),
            "undefined distance class",
        ));
    };
    reader.consume(u32::from(entry.code_bits))?;
    Ok(reader.read(u32::from(width))? as usize + 1)
}

fn read_extended_length(reader: &mut BitReader<'_>) -> Result<usize> {
    let slot = if reader.read(1)? == 0 {
        SHORT_LENGTH_SLOTS[reader.read(3)? as usize]
    } else {
        let entry = LONG_SLOT_TABLE[reader.peek(6) as usize];
        reader.consume(u32::from(entry.code_bits))?;
        LONG_LENGTH_SLOTS[usize::from(entry.slot)]
    };
    let extra = reader.read(u32::from(slot.extra_bits))?;
    Ok(EXTENDED_LENGTH_BIAS + (slot.base + extra) as usize)
}

/// Decompress a pakfile stream in one call.
///
/// # Errors
/// See [`ParamBlock::init`] and [`PakDecompressor::decompress`].
pub fn decompress_pakfile(data: &[u8], payload_offset: usize, header_len: usize) -> Result<Vec<u8>> {
    let mut decoder = PakDecompressor::init(data, payload_offset, header_len)?;
    let mut out = WorkingBuffer::new();
    decoder.decompress(data.len(), &mut out)?;
    Ok(out.into_vec())
}

// ============================================================================
// Test Encoder
// ============================================================================

/// Greedy encoder producing streams the decoder accepts.
#[cfg(test)]
pub(crate) mod encoder {
    use crate::compression::bit_reader::BitWriter;
    use crate::lut::{
        DISTANCE_CODES, EXTENDED_LENGTH_BIAS, EXTENDED_SYMBOL, LONG_LENGTH_SLOTS,
        LONG_SLOT_CODES, MAX_DISTANCE_WIDTH, MIN_DISTANCE_WIDTH, SHORT_LENGTH_SLOTS,
        TOKEN_CODES,
    };

    const MIN_MATCH: usize = 4;
    const WINDOW: usize = 1024;

    fn write_symbol(writer: &mut BitWriter, codes: &[(i8, u8, u8)], symbol: i8) {
        let &(_, code, bits) = codes
            .iter()
            .find(|c| c.0 == symbol)
            .expect("symbol has a code");
        writer.write(u32::from(code), u32::from(bits));
    }

    fn write_extended(writer: &mut BitWriter, value: usize) {
        let value = value as u32;
        if let Some(slot) = SHORT_LENGTH_SLOTS
            .iter()
            .position(|s| value >= s.base && value < s.base + (1 << s.extra_bits))
        {
            writer.write(0, 1);
            writer.write(slot as u32, 3);
            let s = SHORT_LENGTH_SLOTS[slot];
            writer.write(value - s.base, u32::from(s.extra_bits));
            return;
        }
        let slot = LONG_LENGTH_SLOTS
            .iter()
            .position(|s| value >= s.base && value < s.base + (1 << s.extra_bits))
            .expect("length in range");
        let &(_, code, bits) = LONG_SLOT_CODES
            .iter()
            .find(|c| usize::from(c.0) == slot)
            .expect("slot has a code");
        writer.write(1, 1);
        writer.write(u32::from(code), u32::from(bits));
        let s = LONG_LENGTH_SLOTS[slot];
        writer.write(value - s.base, u32::from(s.extra_bits));
    }

    /// Write a literal run token followed by its bytes.
    pub fn literal(writer: &mut BitWriter, bytes: &[u8]) {
        let n = bytes.len();
        if n >= EXTENDED_LENGTH_BIAS {
            write_symbol(writer, &TOKEN_CODES, -EXTENDED_SYMBOL);
            write_extended(writer, n - EXTENDED_LENGTH_BIAS);
        } else {
            write_symbol(writer, &TOKEN_CODES, -(n as i8));
        }
        for &b in bytes {
            writer.write(u32::from(b), 8);
        }
    }

    /// Write a match token of `length` bytes at `distance`.
    pub fn repeat(writer: &mut BitWriter, length: usize, distance: usize) {
        if length >= EXTENDED_LENGTH_BIAS {
            write_symbol(writer, &TOKEN_CODES, EXTENDED_SYMBOL);
            write_extended(writer, length - EXTENDED_LENGTH_BIAS);
        } else {
            write_symbol(writer, &TOKEN_CODES, length as i8);
        }
        let raw = (distance - 1) as u32;
        let width = (32 - raw.leading_zeros()).max(u32::from(MIN_DISTANCE_WIDTH));
        assert!(width <= u32::from(MAX_DISTANCE_WIDTH));
        let &(_, code, bits) = DISTANCE_CODES
            .iter()
            .find(|c| u32::from(c.0) == width)
            .expect("width has a code");
        writer.write(u32::from(code), u32::from(bits));
        writer.write(raw, width);
    }

    fn flush(writer: &mut BitWriter, pending: &mut Vec<u8>) {
        if !pending.is_empty() {
            literal(writer, pending);
            pending.clear();
        }
    }

    /// Encode `data` behind a preamble declaring `data.len()` bytes.
    pub fn encode(data: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::default();
        let mut pending = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let mut best = (0, 0);
            for start in pos.saturating_sub(WINDOW)..pos {
                let len = (0..data.len() - pos)
                    .take_while(|&k| data[start + k] == data[pos + k])
                    .count();
                if len > best.0 {
                    best = (len, pos - start);
                }
            }
            if best.0 >= MIN_MATCH {
                flush(&mut writer, &mut pending);
                repeat(&mut writer, best.0, best.1);
                pos += best.0;
            } else {
                pending.push(data[pos]);
                pos += 1;
            }
        }
        flush(&mut writer, &mut pending);

        let mut out = (data.len() as u32).to_le_bytes().to_vec();
        out.extend(writer.finish());
        out
    }
}

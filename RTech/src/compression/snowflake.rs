//! Snowflake auxiliary stream decoding
//!
//! Some assets carry small sub-streams in a byte-oriented format:
//!
//! ```text
//! u32 LE     decoded length
//! [u8; 16]   substitution dictionary
//! token*     class = t >> 6, n = t & 0x3F
//!   Literal     n + 1 raw bytes
//!   Substitute  n + 1 dictionary indices, two per byte, low nibble first
//!   Repeat      n + 2 bytes copied from (next byte + 1) bytes back
//!   Run         n + 3 copies of the next byte
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::lut::{AUX_CLASS_TABLE, AuxClass};

use super::DCMP_BUF_SIZE;
use super::buffer::WorkingBuffer;

/// Bytes before the first token.
const PREAMBLE_SIZE: usize = 4 + DICTIONARY_SIZE;

const DICTIONARY_SIZE: usize = 16;

/// Decoder for one snowflake stream.
#[derive(Debug, Clone)]
pub struct SnowflakeDecoder<'a> {
    data: &'a [u8],
    decoded_len: usize,
    dictionary: [u8; DICTIONARY_SIZE],
}

impl<'a> SnowflakeDecoder<'a> {
    /// Read the stream preamble.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the preamble is truncated or the
    /// decoded length is zero or above 4 MiB.
    pub fn init(data: &'a [u8]) -> Result<Self> {
        if data.len() < PREAMBLE_SIZE {
            return Err(Error::header(format!(
                "snowflake preamble needs {PREAMBLE_SIZE} bytes, found {}",
                data.len()
            )));
        }
        let decoded_len = LittleEndian::read_u32(&data[..4]) as usize;
        if decoded_len == 0 || decoded_len > DCMP_BUF_SIZE {
            return Err(Error::header(format!(
                "snowflake decoded length {decoded_len} outside 1..={DCMP_BUF_SIZE}"
            )));
        }
        let mut dictionary = [0u8; DICTIONARY_SIZE];
        dictionary.copy_from_slice(&data[4..PREAMBLE_SIZE]);

        Ok(Self {
            data,
            decoded_len,
            dictionary,
        })
    }

    #[must_use]
    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }

    #[must_use]
    pub fn dictionary(&self) -> &[u8; DICTIONARY_SIZE] {
        &self.dictionary
    }

    /// Decode the stream into `out`, reading at most `data_len` input bytes.
    ///
    /// # Errors
    /// - [`Error::BufferOverrun`] if the output would exceed `out`'s capacity
    /// - [`Error::MalformedStream`] if the stream is corrupt or truncated
    pub fn decode(&mut self, data_len: usize, out: &mut WorkingBuffer) -> Result<usize> {
        let result = self.decode_tokens(data_len, out);
        if let Err(err) = &result {
            tracing::warn!("snowflake stream rejected: {err}");
            out.clear();
        }
        result
    }

    fn decode_tokens(&self, data_len: usize, out: &mut WorkingBuffer) -> Result<usize> {
        let mut cursor = ByteCursor {
            data: &self.data[..data_len.min(self.data.len())],
            position: PREAMBLE_SIZE,
        };
        let total = self.decoded_len;
        out.prepare(total);

        while out.len() < total {
            let token = cursor.next_byte()?;
            let entry = AUX_CLASS_TABLE[usize::from(token >> 6)];
            let length = usize::from(token & 0x3F) + usize::from(entry.length_bias);
            out.ensure_token_fits(length, total, cursor.bit_offset())?;

            match entry.class {
                AuxClass::Literal => out.extend_from_slice(cursor.take(length)?)?,
                AuxClass::Substitute => {
                    let packed = cursor.take(length.div_ceil(2))?;
                    for i in 0..length {
                        let nibble = (packed[i / 2] >> ((i % 2) * 4)) & 0x0F;
                        out.push(self.dictionary[usize::from(nibble)])?;
                    }
                }
                AuxClass::Repeat => {
                    let distance = usize::from(cursor.next_byte()?) + 1;
                    if distance > out.len() {
                        return Err(Error::malformed(
                            cursor.bit_offset(),
                            format!(
                                "repeat distance {distance} reaches before the start of {} output bytes",
                                out.len()
                            ),
                        ));
                    }
                    out.copy_match(distance, length)?;
                }
                AuxClass::Run => {
                    let byte = cursor.next_byte()?;
                    out.fill(byte, length)?;
                }
            }
        }

        tracing::debug!("snowflake stream decoded {} bytes", out.len());
        Ok(out.len())
    }
}

struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    fn bit_offset(&self) -> usize {
        self.position * 8
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let end = self.position + count;
        let bytes = data.get(self.position..end).ok_or_else(|| {
            Error::malformed(
                self.bit_offset(),
                format!("input exhausted, {count} bytes needed"),
            )
        })?;
        self.position = end;
        Ok(bytes)
    }

    fn next_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
}

/// Decode a complete snowflake stream in one call.
///
/// # Errors
/// See [`SnowflakeDecoder::init`] and [`SnowflakeDecoder::decode`].
pub fn decompress_snowflake(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = SnowflakeDecoder::init(data)?;
    let mut out = WorkingBuffer::new();
    decoder.decode(data.len(), &mut out)?;
    Ok(out.into_vec())
}

//! Batch decompression of independent pakfile spans
//!
//! Each span gets its own [`ParamBlock`](super::ParamBlock) and
//! [`WorkingBuffer`], so spans decode on the rayon pool without sharing
//! any mutable state.

use rayon::prelude::*;

use crate::error::Result;

use super::DCMP_BUF_SIZE;
use super::buffer::WorkingBuffer;
use super::pakfile::PakDecompressor;

/// One compressed pakfile stream and where its payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedSpan<'a> {
    pub data: &'a [u8],
    /// Byte offset of the stream preamble.
    pub payload_offset: usize,
    /// Leading bytes copied to the output verbatim.
    pub header_len: usize,
}

impl<'a> CompressedSpan<'a> {
    /// A bare stream with no pass-through header.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            payload_offset: 0,
            header_len: 0,
        }
    }

    /// A stream preceded by a header.
    #[must_use]
    pub fn with_header(data: &'a [u8], payload_offset: usize, header_len: usize) -> Self {
        Self {
            data,
            payload_offset,
            header_len,
        }
    }
}

/// Options for batch decompression.
///
/// # Example
///
/// ```
/// use rtech::compression::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .with_capacity(0x10000)
///     .with_parallel(false);
/// assert_eq!(options.capacity, 0x10000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Working buffer capacity per span, at most 4 MiB.
    /// Default: 4 MiB
    pub capacity: usize,

    /// Decode spans on the rayon thread pool.
    /// Default: true
    pub parallel: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Create options with the full working buffer and parallel decoding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: DCMP_BUF_SIZE,
            parallel: true,
        }
    }

    /// Set the per-span buffer capacity (clamped to 4 MiB).
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(DCMP_BUF_SIZE);
        self
    }

    /// Enable or disable parallel decoding.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Decode a single span with the given options.
///
/// # Errors
/// Any error from [`PakDecompressor::init`] or [`PakDecompressor::decompress`].
pub fn decompress_span(span: &CompressedSpan<'_>, options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut decoder = PakDecompressor::init(span.data, span.payload_offset, span.header_len)?;
    let mut out = WorkingBuffer::with_capacity(options.capacity);
    decoder.decompress(span.data.len(), &mut out)?;
    Ok(out.into_vec())
}

/// Decode many spans, returning one result per span in input order.
pub fn decompress_batch(
    spans: &[CompressedSpan<'_>],
    options: &DecodeOptions,
) -> Vec<Result<Vec<u8>>> {
    let results: Vec<Result<Vec<u8>>> = if options.parallel {
        spans
            .par_iter()
            .map(|span| decompress_span(span, options))
            .collect()
    } else {
        spans
            .iter()
            .map(|span| decompress_span(span, options))
            .collect()
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::debug!(
        "batch decompression: {} spans, {} failed",
        spans.len(),
        failed
    );
    results
}

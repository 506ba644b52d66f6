//! Error types for `RTech`

use thiserror::Error;

/// The error type for `RTech` codec operations.
///
/// Every error is terminal for the call that produced it. Decoders never
/// hand back partial output alongside an error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== Stream Errors ====================
    /// The compressed span or its preamble failed validation.
    #[error("invalid stream header: {message}")]
    InvalidHeader {
        /// What was wrong with the header.
        message: String,
    },

    /// The token stream is corrupt or ends early.
    #[error("malformed stream at input bit {offset}: {message}")]
    MalformedStream {
        /// Input bit position at which decoding stopped.
        offset: usize,
        /// What the decoder found there.
        message: String,
    },

    /// A write would run past the end of the working buffer.
    #[error("buffer overrun: {requested} bytes requested, capacity is {capacity}")]
    BufferOverrun {
        /// Output length the write would have produced.
        requested: usize,
        /// Capacity of the working buffer.
        capacity: usize,
    },

    // ==================== Texture Errors ====================
    /// A texel coordinate lies outside the surface.
    #[error("coordinate ({x}, {y}) is outside a {width}x{height} surface")]
    InvalidCoordinate {
        /// Column of the rejected coordinate.
        x: u32,
        /// Row of the rejected coordinate.
        y: u32,
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },

    /// Tile dimensions cannot describe the surface.
    #[error("invalid block shape: {message}")]
    InvalidBlockShape {
        /// Why the shape was rejected.
        message: String,
    },
}

impl Error {
    pub(crate) fn header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedStream {
            offset,
            message: message.into(),
        }
    }
}

/// Result type alias for `RTech` operations.
pub type Result<T> = std::result::Result<T, Error>;

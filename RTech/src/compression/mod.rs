//! Stream decompression for RTech pak containers
//!
//! - [`pakfile`] - the main prefix-coded LZ stream found in rpak payloads
//! - [`snowflake`] - the byte-oriented auxiliary stream embedded in assets
//! - [`batch`] - parallel decoding of many independent spans

pub(crate) mod bit_reader;
mod buffer;

pub mod batch;
pub mod pakfile;
pub mod snowflake;

pub use batch::{CompressedSpan, DecodeOptions, decompress_batch};
pub use buffer::WorkingBuffer;
pub use pakfile::{PakDecompressor, ParamBlock, decompress_pakfile};
pub use snowflake::{SnowflakeDecoder, decompress_snowflake};

/// Size of the decompression working buffer (4 MiB).
pub const DCMP_BUF_SIZE: usize = 0x40_0000;

/// Size of the uncompressed header that leads an rpak file.
pub const PAK_HEADER_SIZE: usize = 0x80;

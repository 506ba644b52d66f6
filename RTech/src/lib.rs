//! # RTech
//!
//! A pure-Rust codec library for Respawn's RTech pak (`.rpak`) containers.
//!
//! ## Components
//!
//! - **Pakfile streams** - prefix-coded LZ decompression into a bounded 4 MiB working buffer
//! - **Snowflake streams** - the byte-oriented auxiliary codec embedded in assets
//! - **Animation tracks** - dynamic translation/scale curves and their peak values
//! - **Rotations** - 128-bit packed quaternions and Euler lanes
//! - **Asset GUIDs** - the 64-bit path hash used to name pak entries
//! - **Texture de-swizzling** - tiled/Morton storage to row-major order
//!
//! ## Quick Start
//!
//! ### Decompressing a Stream
//!
//! ```
//! use rtech::compression::decompress_pakfile;
//!
//! let stream = [
//!     0x0C, 0x00, 0x00, 0x00, 0x67, 0x90, 0xD0, 0x10,
//!     0x51, 0x91, 0xD1, 0x11, 0x12, 0x04, 0x00, 0x00,
//! ];
//! let data = decompress_pakfile(&stream, 0, 0)?;
//! assert_eq!(data, b"ABCDEFGHFGHF");
//! # Ok::<(), rtech::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use rtech::prelude::*;
//!
//! let guid = AssetHash::of("ui/loadscreen.rpak");
//! assert_eq!(guid.to_string(), "7C5898DB16539223");
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod compression;
pub mod error;
pub mod formats;
pub mod lut;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    // Stream decoding
    pub use crate::compression::{
        CompressedSpan, DCMP_BUF_SIZE, DecodeOptions, PAK_HEADER_SIZE, PakDecompressor,
        ParamBlock, SnowflakeDecoder, WorkingBuffer, decompress_batch, decompress_pakfile,
        decompress_snowflake,
    };

    // Asset formats
    pub use crate::formats::animation::{
        AnimTrack, PackedRotation, TrackKind, decode_euler_rotation, decode_rotation,
        decode_track, euler_to_quat, peak_translation,
    };
    pub use crate::formats::common::{AssetHash, asset_guid};
    pub use crate::formats::texture::{BlockShape, unswizzle, unswizzle_surface};

    pub use glam::Quat;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

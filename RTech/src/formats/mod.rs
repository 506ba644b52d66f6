//! Decoders for the compact encodings found inside decompressed paks

pub mod animation;
pub mod common;
pub mod texture;

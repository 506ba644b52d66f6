//! Texture surface addressing

pub mod swizzle;

pub use swizzle::{BlockShape, unswizzle, unswizzle_surface};

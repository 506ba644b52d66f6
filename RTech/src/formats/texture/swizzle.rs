//! Tiled texture de-swizzling
//!
//! Swizzled surfaces store their texels (or compression blocks) tile by tile,
//! tiles in row-major order. Inside a tile, texels follow Morton order: the
//! bits of the in-tile index alternate between x and y, starting with x,
//! and once the shorter axis runs out of bits the rest go to the longer one.
//!
//! A coordinate `(x, y)` here addresses the swizzled storage viewed as rows
//! of `width` elements; the result is where that element lives in a plain
//! row-major surface.

use crate::error::{Error, Result};

/// Surface size and tile size, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockShape {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
}

impl BlockShape {
    /// # Errors
    /// Returns [`Error::InvalidBlockShape`] if a tile side is not a power of
    /// two or the tiles do not divide the surface evenly.
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Result<Self> {
        if !tile_width.is_power_of_two() || !tile_height.is_power_of_two() {
            return Err(Error::InvalidBlockShape {
                message: format!(
                    "tile {tile_width}x{tile_height} is not a power of two on both sides"
                ),
            });
        }
        if width == 0 || height == 0 || width % tile_width != 0 || height % tile_height != 0 {
            return Err(Error::InvalidBlockShape {
                message: format!(
                    "{width}x{height} surface is not a whole number of {tile_width}x{tile_height} tiles"
                ),
            });
        }
        Ok(Self {
            width,
            height,
            tile_width,
            tile_height,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of elements on the surface.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major offset of the element stored at `(x, y)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCoordinate`] if `(x, y)` is off the surface.
    pub fn unswizzle(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidCoordinate {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.linear_offset(y as usize * self.width as usize + x as usize))
    }

    fn linear_offset(&self, storage: usize) -> usize {
        let tile_width = self.tile_width as usize;
        let tile_height = self.tile_height as usize;
        let tiles_per_row = self.width as usize / tile_width;

        let tile = storage / (tile_width * tile_height);
        let (local_x, local_y) = morton_decode(
            storage % (tile_width * tile_height),
            self.tile_width.trailing_zeros(),
            self.tile_height.trailing_zeros(),
        );

        let row = (tile / tiles_per_row) * tile_height + local_y;
        let column = (tile % tiles_per_row) * tile_width + local_x;
        row * self.width as usize + column
    }
}

/// Split an in-tile Morton index into `(x, y)`.
fn morton_decode(mut index: usize, bits_x: u32, bits_y: u32) -> (usize, usize) {
    let (mut x, mut y) = (0, 0);
    let (mut bit_x, mut bit_y) = (0, 0);
    while bit_x < bits_x || bit_y < bits_y {
        if bit_x < bits_x {
            x |= (index & 1) << bit_x;
            index >>= 1;
            bit_x += 1;
        }
        if bit_y < bits_y {
            y |= (index & 1) << bit_y;
            index >>= 1;
            bit_y += 1;
        }
    }
    (x, y)
}

/// Row-major offset of the element stored at `(x, y)` of a swizzled surface.
///
/// # Errors
/// - [`Error::InvalidBlockShape`] if the tile size cannot describe the surface
/// - [`Error::InvalidCoordinate`] if `(x, y)` is off the surface
pub fn unswizzle(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
) -> Result<usize> {
    BlockShape::new(width, height, tile_width, tile_height)?.unswizzle(x, y)
}

/// Reorder a whole swizzled surface into row-major order.
///
/// # Errors
/// Returns [`Error::InvalidBlockShape`] if `data` does not hold exactly one
/// `bytes_per_element` chunk per element.
pub fn unswizzle_surface(
    data: &[u8],
    shape: &BlockShape,
    bytes_per_element: usize,
) -> Result<Vec<u8>> {
    let expected = shape.element_count() * bytes_per_element;
    if bytes_per_element == 0 || data.len() != expected {
        return Err(Error::InvalidBlockShape {
            message: format!(
                "surface holds {} bytes, expected {expected} ({} elements of {bytes_per_element} bytes)",
                data.len(),
                shape.element_count()
            ),
        });
    }

    let mut out = vec![0u8; expected];
    for (storage, chunk) in data.chunks_exact(bytes_per_element).enumerate() {
        let dst = shape.linear_offset(storage) * bytes_per_element;
        out[dst..dst + bytes_per_element].copy_from_slice(chunk);
    }
    tracing::debug!(
        "unswizzled {}x{} surface ({} bytes)",
        shape.width,
        shape.height,
        expected
    );
    Ok(out)
}

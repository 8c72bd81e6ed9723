//! Point-sampled 2D textures
//!
//! Textures are square power-of-two ARGB8888 images sampled with nearest
//! lookup and wrap-around (modulo) addressing. No filtering and no mipmaps;
//! the pixel shader gets exactly one texel back per sample.

use thiserror::Error;

/// Default edge length used by the procedural constructors.
pub const DEFAULT_TEXTURE_SIZE: u32 = 64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be a power of two, got {0}x{0}")]
    NotPowerOfTwo(u32),
    #[error("pixel data length {got} does not match {size}x{size}")]
    WrongLength { size: u32, got: usize },
}

/// A square, power-of-two ARGB texture.
///
/// The power-of-two restriction lets wrap addressing be a bit mask, which
/// keeps `sample_point_wrap` branch-free on the hot path.
#[derive(Debug, Clone)]
pub struct Texture2D {
    size: u32,
    mask: i32,
    data: Vec<u32>,
}

impl Texture2D {
    /// Create a texture from raw ARGB pixels, row-major.
    pub fn from_pixels(size: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        if size == 0 || !size.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo(size));
        }
        if data.len() != (size * size) as usize {
            return Err(TextureError::WrongLength {
                size,
                got: data.len(),
            });
        }
        Ok(Self {
            size,
            mask: (size - 1) as i32,
            data,
        })
    }

    /// Black & white checkerboard, 8x8 texel cells.
    pub fn checkerboard() -> Self {
        let size = DEFAULT_TEXTURE_SIZE;
        let mut data = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let cell = ((x >> 3) ^ (y >> 3)) & 1;
                data.push(if cell == 0 { 0xFFFFFFFF } else { 0xFF000000 });
            }
        }
        // Size is a power of two by construction
        Self::from_pixels(size, data).expect("checkerboard dimensions")
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Nearest-texel sample with wrap-around addressing.
    ///
    /// `u` and `v` are in texture space where `[0, 1)` covers the image
    /// once; coordinates outside that range (including negative ones) wrap.
    #[inline]
    pub fn sample_point_wrap(&self, u: f32, v: f32) -> u32 {
        let x = (u * self.size as f32).floor() as i32 & self.mask;
        let y = (v * self.size as f32).floor() as i32 & self.mask;
        self.data[(y as u32 * self.size + x as u32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_validation() {
        assert_eq!(
            Texture2D::from_pixels(3, vec![0; 9]).unwrap_err(),
            TextureError::NotPowerOfTwo(3)
        );
        assert_eq!(
            Texture2D::from_pixels(0, vec![]).unwrap_err(),
            TextureError::NotPowerOfTwo(0)
        );
        assert_eq!(
            Texture2D::from_pixels(4, vec![0; 15]).unwrap_err(),
            TextureError::WrongLength { size: 4, got: 15 }
        );
        assert!(Texture2D::from_pixels(4, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_checkerboard_pattern() {
        let tex = Texture2D::checkerboard();
        assert_eq!(tex.size(), DEFAULT_TEXTURE_SIZE);

        // First cell is white, the next cell over is black
        assert_eq!(tex.sample_point_wrap(0.0, 0.0), 0xFFFFFFFF);
        let cell = 8.0 / DEFAULT_TEXTURE_SIZE as f32;
        assert_eq!(tex.sample_point_wrap(cell, 0.0), 0xFF000000);
        assert_eq!(tex.sample_point_wrap(0.0, cell), 0xFF000000);
        assert_eq!(tex.sample_point_wrap(cell, cell), 0xFFFFFFFF);
    }

    #[test]
    fn test_sample_wraps_out_of_range() {
        let tex = Texture2D::checkerboard();

        // One full period to the right/left samples the same texel
        assert_eq!(
            tex.sample_point_wrap(0.1, 0.2),
            tex.sample_point_wrap(1.1, 0.2)
        );
        assert_eq!(
            tex.sample_point_wrap(0.1, 0.2),
            tex.sample_point_wrap(-0.9, 1.2)
        );
    }

    #[test]
    fn test_sample_picks_nearest_texel() {
        // 2x2 texture with distinct texels
        let tex = Texture2D::from_pixels(2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(tex.sample_point_wrap(0.0, 0.0), 1);
        assert_eq!(tex.sample_point_wrap(0.5, 0.0), 2);
        assert_eq!(tex.sample_point_wrap(0.0, 0.5), 3);
        assert_eq!(tex.sample_point_wrap(0.75, 0.75), 4);
    }
}

//! Core rendering primitives shared by the rasterizer and frontends.

pub mod graphics;
pub mod logging;
pub mod texture;
pub mod threading;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// A color plane: one packed ARGB8888 value per pixel.
    ///
    /// Pixels are stored in row-major order, index = `y * width + x`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }

        /// Fill every pixel with a solid color.
        pub fn fill(&mut self, color: u32) {
            self.pixels.fill(color);
        }

        /// Read a pixel, or `None` when out of bounds.
        pub fn read(&self, x: u32, y: u32) -> Option<u32> {
            if x >= self.width || y >= self.height {
                return None;
            }
            self.pixels.get((y * self.width + x) as usize).copied()
        }

        /// Write a pixel; out-of-bounds writes are dropped.
        #[inline]
        pub fn write(&mut self, x: u32, y: u32, color: u32) {
            if x < self.width && y < self.height {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }
    }
}

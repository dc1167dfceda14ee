use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::Result;

/// Bytes per pixel.
pub const CHANNELS: usize = 3;

/// Row-major RGB frame. Only the engine writes one, and only while rendering
/// it; callers always receive a complete frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbImage,
}

impl PixelBuffer {
    pub(crate) fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Disjoint mutable rows, top to bottom.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.image.width() as usize * CHANNELS;
        self.image.chunks_mut(stride)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Packed RGB bytes, `width * height * 3` long.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        log::info!(
            "wrote {}x{} frame to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}

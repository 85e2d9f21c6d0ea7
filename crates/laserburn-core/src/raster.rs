//! Decoded raster input
//!
//! A [`Raster`] is the bitmap handed to the engraver: row-major pixels with a
//! top-left origin and either three (RGB) or four (RGBA) bytes per pixel.
//! Its shape is validated on construction and it is immutable afterwards.

use crate::error::InputError;
use crate::params::Rgb;
use image::DynamicImage;

/// Validated, immutable pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from raw bytes.
    ///
    /// `has_alpha` selects a stride of four bytes per pixel, otherwise three.
    pub fn new(
        width: u32,
        height: u32,
        has_alpha: bool,
        pixels: Vec<u8>,
    ) -> Result<Self, InputError> {
        let channels = if has_alpha { 4 } else { 3 };
        Self::with_channels(width, height, channels, pixels)
    }

    /// Create a raster with an explicit channel count (3 or 4).
    pub fn with_channels(
        width: u32,
        height: u32,
        channels: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::EmptyRaster { width, height });
        }
        if channels != 3 && channels != 4 {
            return Err(InputError::UnsupportedChannels { channels });
        }

        let expected = width as usize * height as usize * channels;
        if pixels.len() != expected {
            return Err(InputError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Convert a decoded image into an RGB raster, compositing any
    /// transparency over `background`.
    pub fn from_image(img: &DynamicImage, background: Rgb) -> Result<Self, InputError> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            pixels.push(blend(r, background.r, a));
            pixels.push(blend(g, background.g, a));
            pixels.push(blend(b, background.b, a));
        }

        Self::with_channels(width, height, 3, pixels)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel (3 or 4)
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Whether the buffer carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Color channels of the pixel at `pixel_offset` (row-major pixel index,
    /// not byte index). Alpha is not returned.
    pub fn rgb_at(&self, pixel_offset: usize) -> (u8, u8, u8) {
        let pos = pixel_offset * self.channels;
        (self.pixels[pos], self.pixels[pos + 1], self.pixels[pos + 2])
    }
}

/// Alpha-composite one channel over the background, rounding to nearest.
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

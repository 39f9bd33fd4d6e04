//! Working image buffer for slide analysis.
//!
//! Images are stored as packed RGB `f32` in [0.0, 1.0]. Decoding and encoding
//! are delegated to the `image` crate; everything else in the pipeline works on
//! this buffer.

mod color;


use std::path::Path;

use thiserror::Error;

pub use color::Color;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Packed RGB f32 image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl Image {
    pub const CHANNELS: usize = 3;

    pub fn new_black(width: u32, height: u32) -> Self {
        Self::new_filled(width, height, Color::BLACK)
    }

    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        let rgb = color.to_rgb();
        let pixels = (0..width as usize * height as usize)
            .flat_map(|_| rgb)
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build from tightly packed 8-bit RGB bytes.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if bytes.len() != expected {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels: bytes.iter().map(|&b| b as f32 / 255.0).collect(),
        })
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb8(width, height, rgb.as_raw())
    }

    /// Encode with the format implied by the file extension.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_rgb8().save(path)?;
        Ok(())
    }

    pub fn to_rgb8(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(Color::from(self.pixel(x, y)).to_rgb_u8())
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.offset(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Blend `color` into the pixel at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        let idx = self.offset(x as u32, y as u32);
        let dst = [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]];
        self.pixels[idx..idx + Self::CHANNELS].copy_from_slice(&color.over(dst));
    }

    /// Count pixels whose RGB matches `color` within `tolerance` per channel.
    pub fn count_pixels_matching(&self, color: Color, tolerance: f32) -> usize {
        let target = color.to_rgb();
        self.pixels
            .chunks_exact(Self::CHANNELS)
            .filter(|p| {
                p.iter()
                    .zip(target.iter())
                    .all(|(a, b)| (a - b).abs() <= tolerance)
            })
            .count()
    }
}

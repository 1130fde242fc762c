//! Frame and matte buffers in CPU memory.
//!
//! All buffers are tightly packed, row-major, one element per pixel.

use crate::color::{Rgb, Rgba};
use crate::error::{KeyerError, Result};

fn check_dimensions(width: u32, height: u32, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(KeyerError::MalformedFrame(format!(
            "zero-sized frame {width}x{height}"
        )));
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| KeyerError::MalformedFrame("frame dimensions overflow".into()))?;
    if len != expected {
        return Err(KeyerError::MalformedFrame(format!(
            "expected {expected} pixels for {width}x{height}, got {len}"
        )));
    }
    Ok(())
}

/// Row-major offset of `(x, y)`, computed in `usize` so large frames cannot wrap.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// An opaque RGB video frame with normalized float channels.
///
/// Frames are owned by the caller; keying borrows them and never mutates
/// the input in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Frame {
    /// Wrap a pixel buffer, checking it against the declared dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        check_dimensions(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Frame filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Result<Self> {
        let len = (width as usize).saturating_mul(height as usize);
        Self::new(width, height, vec![color; len])
    }

    /// Build a frame from packed 8-bit RGBA bytes. The alpha byte is ignored.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if data.len() % 4 != 0 {
            return Err(KeyerError::MalformedFrame(format!(
                "RGBA8 buffer length {} is not a multiple of 4",
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Rgb::from_rgb8(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Build a frame from packed 8-bit RGB bytes.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if data.len() % 3 != 0 {
            return Err(KeyerError::MalformedFrame(format!(
                "RGB8 buffer length {} is not a multiple of 3",
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(3)
            .map(|px| Rgb::from_rgb8(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Build a frame from interleaved `[r, g, b, r, g, b, ...]` floats.
    pub fn from_f32(width: u32, height: u32, data: &[f32]) -> Result<Self> {
        let pixels: &[Rgb] = bytemuck::try_cast_slice(data).map_err(|e| {
            KeyerError::MalformedFrame(format!("float buffer is not packed RGB: {e}"))
        })?;
        Self::new(width, height, pixels.to_vec())
    }

    /// Fail on any NaN or infinite channel.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height, self.pixels.len())?;
        if let Some(i) = self.pixels.iter().position(|p| !p.is_finite()) {
            return Err(KeyerError::MalformedFrame(format!(
                "non-finite pixel at ({}, {})",
                i % self.width as usize,
                i / self.width as usize
            )));
        }
        Ok(())
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
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Mutable pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut Rgb {
        &mut self.pixels[pixel_index(self.width, x, y)]
    }
}

/// Per-pixel transparency field in [0,1]; 0 is background, 1 is subject.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMatte {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
}

impl AlphaMatte {
    /// Matte filled with `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            data: vec![value; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Wrap an existing buffer.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        check_dimensions(width, height, data.len())?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Sample with clamp-to-edge addressing.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        let x = x.clamp(0, self.width as i32 - 1) as u32;
        let y = y.clamp(0, self.height as i32 - 1) as u32;
        self.data[pixel_index(self.width, x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, val: f32) {
        if x < self.width && y < self.height {
            self.data[pixel_index(self.width, x, y)] = val;
        }
    }

    /// Mean alpha, handy for coverage diagnostics.
    pub fn coverage(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}

/// Keyer output: straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl RgbaFrame {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Packed 8-bit RGBA bytes for PNG writers and encoders.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba8()).collect()
    }

    /// Interleaved float view of the pixels.
    #[inline]
    pub fn as_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Flatten over an opaque background frame of the same size.
    pub fn composite_over(&self, background: &Frame) -> Result<Frame> {
        if background.width() != self.width || background.height() != self.height {
            return Err(KeyerError::MalformedFrame(format!(
                "background is {}x{}, foreground is {}x{}",
                background.width(),
                background.height(),
                self.width,
                self.height
            )));
        }
        let pixels = self
            .pixels
            .iter()
            .zip(background.pixels())
            .map(|(fg, bg)| fg.over(*bg))
            .collect();
        Frame::new(self.width, self.height, pixels)
    }
}

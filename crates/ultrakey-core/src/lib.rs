//! UltraKey Core - Foundation types for chroma keying
//!
//! This crate provides the fundamental types used throughout UltraKey:
//! - Pixel types and RGB↔HSV conversion
//! - Frame, alpha matte and RGBA output buffers
//! - The shared error type

pub mod color;
pub mod error;
pub mod frame;

pub use color::{hsv_to_rgb, hue_delta, rgb_to_hsv, smoothstep, Hsv, Rgb, Rgba};
pub use error::{KeyerError, Result};
pub use frame::{AlphaMatte, Frame, RgbaFrame};

//! Pixel types and RGB↔HSV conversion.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Below this chroma the hue is undefined and reported as 0.
const ACHROMATIC_EPSILON: f32 = 1e-6;

/// Opaque RGB pixel with normalized [0,1] float channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a pixel from 8-bit channel values.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Rec. 601 luma, the weighting used for all keying decisions.
    #[inline]
    pub fn luma(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Linear interpolation toward `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::from(Vec3::from(self).lerp(Vec3::from(other), t))
    }

    /// Clamp every channel to [0,1].
    #[inline]
    pub fn saturate(self) -> Self {
        Self::from(Vec3::from(self).clamp(Vec3::ZERO, Vec3::ONE))
    }

    /// True when every channel is a finite number.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Convert to HSV.
    #[inline]
    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }

    /// Attach an alpha channel.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0);
}

impl From<Rgb> for Vec3 {
    #[inline]
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl From<Vec3> for Rgb {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Rgb {
    #[inline]
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// RGBA color with 32-bit float components, straight (not premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color channels without alpha.
    #[inline]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Convert to 8-bit RGBA.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Blend over an opaque background: `bg * (1 - a) + fg * a`.
    #[inline]
    pub fn over(self, background: Rgb) -> Rgb {
        background.lerp(self.rgb(), self.a.clamp(0.0, 1.0))
    }
}

/// HSV triple. Hue is normalized to [0,1) over the full wheel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    #[inline]
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Hue in degrees.
    #[inline]
    pub fn hue_degrees(self) -> f32 {
        self.h * 360.0
    }

    #[inline]
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self)
    }
}

impl From<Hsv> for Vec3 {
    #[inline]
    fn from(c: Hsv) -> Self {
        Vec3::new(c.h, c.s, c.v)
    }
}

/// Convert RGB to HSV using the max/min/delta formulation.
///
/// Gray, black and white have no defined hue; they report `h = 0` and never NaN.
/// Channels are clamped to [0,1] first, so every component lands in [0,1].
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let c = c.saturate();
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let delta = max - min;

    let v = max;
    let s = if max > ACHROMATIC_EPSILON { delta / max } else { 0.0 };

    if delta <= ACHROMATIC_EPSILON {
        return Hsv::new(0.0, s, v);
    }

    let sector = if max == c.r {
        ((c.g - c.b) / delta).rem_euclid(6.0)
    } else if max == c.g {
        (c.b - c.r) / delta + 2.0
    } else {
        (c.r - c.g) / delta + 4.0
    };

    let mut h = sector / 6.0;
    if h >= 1.0 {
        h -= 1.0;
    }
    Hsv::new(h, s, v)
}

/// Convert HSV back to RGB. Hue is interpreted modulo 1.
pub fn hsv_to_rgb(c: Hsv) -> Rgb {
    let h = c.h.rem_euclid(1.0) * 6.0;
    let s = c.s.clamp(0.0, 1.0);
    let v = c.v;

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as i32 % 6 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

/// Signed hue difference `a - b`, wrapped to the shorter arc in [-0.5, 0.5].
#[inline]
pub fn hue_delta(a: f32, b: f32) -> f32 {
    let d = a - b;
    if d.abs() > 0.5 {
        d - d.signum()
    } else {
        d
    }
}

/// Hermite smoothstep. Accepts `edge0 > edge1` for a falling ramp.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

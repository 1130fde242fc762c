//! Spill suppression: pull key-colored contamination on the subject toward gray.

use super::params::KeyingParameters;
use ultrakey_core::Rgb;

/// Pixels more transparent than this are left alone.
pub const SPILL_ALPHA_THRESHOLD: f32 = 0.05;

/// Suppression below this is treated as off.
pub const SPILL_THRESHOLD: f32 = 1.0;

/// Share of the strength used for the overall desaturation.
const DESATURATE_SCALE: f32 = 0.4;

/// Which channel carries the spill for a given key hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Green,
    Blue,
    /// Neither green nor blue: only the light desaturation applies.
    Other,
}

impl KeyFamily {
    /// Classify a key hue in [0,1). The green range is checked first, so the
    /// overlap (0.45, 0.5) counts as green.
    pub fn from_hue(hue: f32) -> Self {
        if hue > 0.2 && hue < 0.5 {
            Self::Green
        } else if hue > 0.45 && hue < 0.75 {
            Self::Blue
        } else {
            Self::Other
        }
    }
}

/// Spill suppressor for one parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillSuppressor {
    family: KeyFamily,
    strength: f32,
    enabled: bool,
}

impl SpillSuppressor {
    pub fn new(params: &KeyingParameters) -> Self {
        Self::from_hue(params.key_color.to_hsv().h, params.spill_suppression)
    }

    /// `spill` in [0,100].
    pub fn from_hue(key_hue: f32, spill: f32) -> Self {
        Self {
            family: KeyFamily::from_hue(key_hue),
            strength: spill * 0.01,
            enabled: spill >= SPILL_THRESHOLD,
        }
    }

    #[inline]
    pub fn family(&self) -> KeyFamily {
        self.family
    }

    /// Suppressed color for a pixel with final alpha `alpha`.
    pub fn apply(&self, color: Rgb, alpha: f32) -> Rgb {
        if !self.enabled || alpha < SPILL_ALPHA_THRESHOLD {
            return color;
        }
        let s = self.strength;
        let luma = color.luma();
        let mut out = color;

        let channel = match self.family {
            KeyFamily::Green => Some(&mut out.g),
            KeyFamily::Blue => Some(&mut out.b),
            KeyFamily::Other => None,
        };
        if let Some(c) = channel {
            if *c > luma {
                *c = *c * (1.0 - s) + luma * s;
            }
        }

        out.lerp(Rgb::new(luma, luma, luma), s * DESATURATE_SCALE)
            .saturate()
    }
}

/// One-off spill suppression of a single pixel.
pub fn suppress_spill(color: Rgb, alpha: f32, key_hue: f32, spill: f32) -> Rgb {
    SpillSuppressor::from_hue(key_hue, spill).apply(color, alpha)
}

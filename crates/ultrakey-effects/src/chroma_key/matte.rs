//! Matte generation: weighted HSV distance to the key color, mapped to alpha.
//!
//! Uses the linear-ramp form: `alpha = clamp(slope * dist - offset, 0, 1)`
//! with `slope = 3 + (transparency - 50) * 0.06` and
//! `offset = 1.5 - (transparency - 50) * 0.03`. Luminance bias for highlights
//! and shadows plus the pedestal shift are applied on top.

use super::params::KeyingParameters;
use glam::Vec3;
use ultrakey_core::{hue_delta, smoothstep, Hsv, Rgb};

/// Base HSV weights: hue dominates, saturation counts least.
const HSV_WEIGHTS: Vec3 = Vec3::new(4.0, 1.0, 2.0);

/// Precomputed matte generator for one parameter snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MatteGenerator {
    key_hsv: Hsv,
    weights: Vec3,
    slope: f32,
    offset: f32,
    highlight_bias: f32,
    shadow_bias: f32,
    pedestal: f32,
}

impl MatteGenerator {
    pub fn new(params: &KeyingParameters) -> Self {
        let tol_factor = 1.0 + (params.tolerance - 50.0) * 0.02;
        let t = params.transparency - 50.0;
        Self {
            key_hsv: params.key_color.to_hsv(),
            weights: HSV_WEIGHTS * tol_factor,
            slope: 3.0 + t * 0.06,
            offset: 1.5 - t * 0.03,
            highlight_bias: (params.highlight - 50.0) * 0.02,
            shadow_bias: (params.shadow - 50.0) * 0.02,
            pedestal: params.pedestal * 0.01,
        }
    }

    /// HSV of the key color.
    #[inline]
    pub fn key_hsv(&self) -> Hsv {
        self.key_hsv
    }

    /// Weighted HSV distance between `pixel` and the key, hue on the shorter arc.
    #[inline]
    pub fn distance(&self, pixel: Rgb) -> f32 {
        let hsv = pixel.to_hsv();
        let diff = Vec3::new(
            hue_delta(self.key_hsv.h, hsv.h),
            self.key_hsv.s - hsv.s,
            self.key_hsv.v - hsv.v,
        );
        (self.weights * diff).length()
    }

    /// Alpha ramp for a distance, before luminance bias and pedestal.
    #[inline]
    pub fn ramp(&self, dist: f32) -> f32 {
        (self.slope * dist - self.offset).clamp(0.0, 1.0)
    }

    /// Raw alpha for one pixel.
    pub fn alpha(&self, pixel: Rgb) -> f32 {
        let mut alpha = self.ramp(self.distance(pixel));

        let luma = pixel.luma();
        if luma > 0.5 {
            alpha -= smoothstep(0.5, 1.0, luma) * self.highlight_bias;
        } else if luma < 0.5 {
            alpha += smoothstep(0.5, 0.0, luma) * self.shadow_bias;
        }

        alpha += self.pedestal;
        alpha.clamp(0.0, 1.0)
    }
}

/// Raw alpha of a single pixel under `params`.
pub fn generate_alpha(pixel: Rgb, params: &KeyingParameters) -> f32 {
    MatteGenerator::new(params).alpha(pixel)
}

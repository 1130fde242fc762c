//! Matte refinement over a materialized matte: choke (erode/dilate) then soften.
//!
//! Both operations read only the input matte and write a new one, so every
//! output row can be computed in parallel.

use rayon::prelude::*;
use ultrakey_core::AlphaMatte;

/// Pixels of choke radius per unit of the choke control.
pub const CHOKE_RADIUS_SCALE: f32 = 0.15;

/// Pixels of blur radius per unit of the soften control.
pub const SOFTEN_RADIUS_SCALE: f32 = 0.5;

/// Choke magnitudes below this pass the matte through.
const CHOKE_EPSILON: f32 = 0.01;

/// Square neighborhood half-width for a choke value.
///
/// Any choke above the epsilon reaches at least the immediate neighbors.
pub fn choke_radius(choke: f32) -> u32 {
    if choke.abs() < CHOKE_EPSILON {
        0
    } else {
        (choke.abs() * CHOKE_RADIUS_SCALE).ceil() as u32
    }
}

/// Erode (`choke > 0`, neighborhood minimum) or dilate (`choke < 0`,
/// neighborhood maximum) the matte.
///
/// A square window is separable, so the min/max runs as a horizontal then a
/// vertical pass.
pub fn choke(matte: &AlphaMatte, choke: f32) -> AlphaMatte {
    let radius = choke_radius(choke) as i32;
    if radius == 0 {
        return matte.clone();
    }
    let reduce: fn(f32, f32) -> f32 = if choke > 0.0 { f32::min } else { f32::max };

    let horizontal = window_pass(matte, |src, x, y| {
        let mut v = src.get(x, y);
        for dx in 1..=radius {
            v = reduce(v, reduce(src.get(x - dx, y), src.get(x + dx, y)));
        }
        v
    });
    window_pass(&horizontal, |src, x, y| {
        let mut v = src.get(x, y);
        for dy in 1..=radius {
            v = reduce(v, reduce(src.get(x, y - dy), src.get(x, y + dy)));
        }
        v
    })
}

/// Blur radii at or below this leave the matte unchanged.
const MIN_SOFTEN_RADIUS: f32 = f32::EPSILON;

/// Normalized 1D kernel with weights `exp(-d² / r²)` for `d` in `-half..=half`.
fn blur_kernel(radius: f32) -> Vec<f32> {
    let half = radius.ceil() as i32;
    // r² must stay positive or the center tap becomes 0/0.
    let r2 = (radius * radius).max(f32::MIN_POSITIVE);
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|d| (-((d * d) as f32) / r2).exp())
        .collect();
    // The center tap is exp(0) = 1, so the sum never reaches zero.
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Distance-weighted blur of the matte with radius `soften * SOFTEN_RADIUS_SCALE`.
///
/// The blur is applied everywhere, not only where the alpha gradient is
/// non-zero; flat regions are unchanged by a normalized kernel anyway.
/// `soften <= 0`, or a radius too small to reach a neighbor's weight,
/// returns the matte unchanged.
pub fn soften(matte: &AlphaMatte, soften: f32) -> AlphaMatte {
    let radius = soften * SOFTEN_RADIUS_SCALE;
    if radius <= MIN_SOFTEN_RADIUS {
        return matte.clone();
    }
    let kernel = blur_kernel(radius);
    let half = (kernel.len() / 2) as i32;

    let horizontal = window_pass(matte, |src, x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * src.get(x + k as i32 - half, y))
            .sum()
    });
    window_pass(&horizontal, |src, x, y| {
        let v: f32 = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * src.get(x, y + k as i32 - half))
            .sum();
        v.clamp(0.0, 1.0)
    })
}

/// Choke first, then soften. The order matters: erosion then blur.
pub fn refine(matte: &AlphaMatte, choke_amount: f32, soften_amount: f32) -> AlphaMatte {
    let choked = choke(matte, choke_amount);
    soften(&choked, soften_amount)
}

/// Build a new matte where each pixel is `f(src, x, y)`, rows in parallel.
fn window_pass<F>(src: &AlphaMatte, f: F) -> AlphaMatte
where
    F: Fn(&AlphaMatte, i32, i32) -> f32 + Sync,
{
    if src.data.is_empty() {
        return src.clone();
    }
    let mut out = AlphaMatte::filled(src.width, src.height, 0.0);
    out.data
        .par_chunks_mut(src.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = f(src, x as i32, y as i32);
            }
        });
    out
}

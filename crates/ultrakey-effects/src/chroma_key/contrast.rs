//! Alpha S-curve around a pivot (contrast + mid point).

/// Contrast at or below this is treated as off.
pub const CONTRAST_THRESHOLD: f32 = 1.0;

/// Keeps the pivot off 0 and 1 so neither branch divides by zero.
const PIVOT_EPSILON: f32 = 1e-6;

/// Per-pixel contrast remap for one parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastCurve {
    pivot: f32,
    k: f32,
    enabled: bool,
}

impl ContrastCurve {
    /// `contrast` in [0,200], `mid_point` in [0,100].
    pub fn new(contrast: f32, mid_point: f32) -> Self {
        Self {
            pivot: (mid_point * 0.01).clamp(PIVOT_EPSILON, 1.0 - PIVOT_EPSILON),
            k: contrast * 0.01,
            enabled: contrast > CONTRAST_THRESHOLD,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Remap `alpha`. Monotonic, with the pivot as a fixed point.
    #[inline]
    pub fn apply(&self, alpha: f32) -> f32 {
        if !self.enabled {
            return alpha;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let p = self.pivot;
        let out = if alpha < p {
            p * (alpha / p).powf(1.0 + self.k)
        } else {
            p + (1.0 - p) * ((alpha - p) / (1.0 - p)).powf(1.0 / (1.0 + self.k))
        };
        out.clamp(0.0, 1.0)
    }
}

/// One-off contrast remap of a single alpha value.
pub fn apply_contrast(alpha: f32, contrast: f32, mid_point: f32) -> f32 {
    ContrastCurve::new(contrast, mid_point).apply(alpha)
}

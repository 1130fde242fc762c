//! Output selection: composite, alpha-only, or status visualization.

use super::params::OutputMode;
use ultrakey_core::{Rgb, Rgba};

/// Matte quality bucket shown in status mode.
///
/// Lower bounds are inclusive: alpha exactly 0.05 is `Poor`, exactly 0.95 is
/// `Opaque`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBand {
    /// alpha < 0.05, ideal background.
    Transparent,
    /// 0.05 <= alpha < 0.4
    Poor,
    /// 0.4 <= alpha < 0.7
    Marginal,
    /// 0.7 <= alpha < 0.95
    Acceptable,
    /// alpha >= 0.95, ideal subject.
    Opaque,
}

impl StatusBand {
    pub fn from_alpha(alpha: f32) -> Self {
        if alpha < 0.05 {
            Self::Transparent
        } else if alpha < 0.4 {
            Self::Poor
        } else if alpha < 0.7 {
            Self::Marginal
        } else if alpha < 0.95 {
            Self::Acceptable
        } else {
            Self::Opaque
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Transparent => Rgb::BLACK,
            Self::Poor => Rgb::RED,
            Self::Marginal => Rgb::YELLOW,
            Self::Acceptable => Rgb::BLUE,
            Self::Opaque => Rgb::WHITE,
        }
    }
}

/// Combine final color and alpha for presentation.
#[inline]
pub fn select_output(color: Rgb, alpha: f32, mode: OutputMode) -> Rgba {
    match mode {
        OutputMode::Composite => color.with_alpha(alpha),
        OutputMode::Alpha => Rgba::new(alpha, alpha, alpha, 1.0),
        OutputMode::Status => StatusBand::from_alpha(alpha).color().with_alpha(1.0),
    }
}

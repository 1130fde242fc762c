//! Keyer controls, their documented ranges, and validation.

use crate::{ParamDescriptor, ParamValue};
use serde::{Deserialize, Serialize};
use tracing::warn;
use ultrakey_core::{KeyerError, Result, Rgb};

/// Standard green screen key color.
pub const STANDARD_GREEN: Rgb = Rgb::new(0.157, 0.576, 0.129);

/// Presentation selector for the keyed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Spill-suppressed color with the matte as alpha.
    #[default]
    Composite,
    /// Grayscale matte, fully opaque.
    Alpha,
    /// Matte quality bands for diagnosing a key.
    Status,
}

impl OutputMode {
    /// Numeric index used on the command line (`0`, `1`, `2`).
    pub fn index(self) -> u8 {
        match self {
            Self::Composite => 0,
            Self::Alpha => 1,
            Self::Status => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Composite),
            1 => Some(Self::Alpha),
            2 => Some(Self::Status),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Composite => "Composite",
            Self::Alpha => "Alpha Channel",
            Self::Status => "Status",
        }
    }
}

impl TryFrom<u8> for OutputMode {
    type Error = KeyerError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
            .ok_or_else(|| KeyerError::InvalidParameter(format!("output mode {index} (expected 0-2)")))
    }
}

/// Inclusive slider range of a scalar control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }
}

pub const PERCENT_RANGE: ParamRange = ParamRange::new(0.0, 100.0);
pub const CONTRAST_RANGE: ParamRange = ParamRange::new(0.0, 200.0);
pub const CHOKE_RANGE: ParamRange = ParamRange::new(-20.0, 20.0);
pub const SOFTEN_RANGE: ParamRange = ParamRange::new(0.0, 20.0);
pub const COLOR_RANGE: ParamRange = ParamRange::new(0.0, 1.0);

/// One snapshot of every keyer control.
///
/// Immutable while a frame is being keyed; the UI or CLI builds a new value
/// between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyingParameters {
    /// Background color to remove.
    pub key_color: Rgb,
    /// Shifts the alpha threshold and slope (0-100).
    pub transparency: f32,
    /// Widens or narrows the HSV distance weighting (0-100).
    pub tolerance: f32,
    /// Alpha bias in bright regions (0-100, 50 neutral).
    pub highlight: f32,
    /// Alpha bias in dark regions (0-100, 50 neutral).
    pub shadow: f32,
    /// Uniform alpha shift (0-100).
    pub pedestal: f32,
    /// Spill removal strength (0-100).
    pub spill_suppression: f32,
    /// Alpha S-curve steepness (0-200, 0 disables).
    pub contrast: f32,
    /// Pivot of the contrast curve (0-100).
    pub mid_point: f32,
    /// Positive erodes the matte, negative dilates it (-20..20).
    pub choke: f32,
    /// Edge blur amount (0-20).
    pub soften: f32,
    pub output_mode: OutputMode,
}

impl Default for KeyingParameters {
    fn default() -> Self {
        Self {
            key_color: STANDARD_GREEN,
            transparency: 50.0,
            tolerance: 50.0,
            highlight: 50.0,
            shadow: 50.0,
            pedestal: 0.0,
            spill_suppression: 30.0,
            contrast: 0.0,
            mid_point: 50.0,
            choke: 0.0,
            soften: 0.0,
            output_mode: OutputMode::Composite,
        }
    }
}

impl KeyingParameters {
    /// Every control at its neutral value: no bias, no cleanup, no spill removal.
    pub fn neutral() -> Self {
        Self {
            spill_suppression: 0.0,
            ..Self::default()
        }
    }

    /// Same controls, different key color.
    pub fn with_key_color(mut self, key_color: Rgb) -> Self {
        self.key_color = key_color;
        self
    }

    /// Same controls, different output mode.
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    fn scalars_mut(&mut self) -> [(&'static str, &mut f32, ParamRange); 13] {
        [
            ("key_color.r", &mut self.key_color.r, COLOR_RANGE),
            ("key_color.g", &mut self.key_color.g, COLOR_RANGE),
            ("key_color.b", &mut self.key_color.b, COLOR_RANGE),
            ("transparency", &mut self.transparency, PERCENT_RANGE),
            ("tolerance", &mut self.tolerance, PERCENT_RANGE),
            ("highlight", &mut self.highlight, PERCENT_RANGE),
            ("shadow", &mut self.shadow, PERCENT_RANGE),
            ("pedestal", &mut self.pedestal, PERCENT_RANGE),
            ("spill_suppression", &mut self.spill_suppression, PERCENT_RANGE),
            ("contrast", &mut self.contrast, CONTRAST_RANGE),
            ("mid_point", &mut self.mid_point, PERCENT_RANGE),
            ("choke", &mut self.choke, CHOKE_RANGE),
            ("soften", &mut self.soften, SOFTEN_RANGE),
        ]
    }

    /// Reject non-finite controls and clamp the rest into their ranges.
    ///
    /// Out-of-range values are clamped rather than rejected, matching slider
    /// behavior. Runs once per frame before any pixel is processed.
    pub fn sanitized(&self) -> Result<Self> {
        let mut out = self.clone();
        for (name, value, range) in out.scalars_mut() {
            if !value.is_finite() {
                return Err(KeyerError::InvalidParameter(format!("{name} is {value}")));
            }
            let clamped = range.clamp(*value);
            if clamped != *value {
                warn!(param = name, value = *value, clamped, "parameter out of range, clamped");
                *value = clamped;
            }
        }
        Ok(out)
    }

    /// Set a control by its descriptor name. The value is clamped to range.
    ///
    /// On error `self` is left as it was.
    pub fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        let mismatch = || {
            KeyerError::InvalidParameter(format!("{name} does not accept {value:?}"))
        };
        let scalar = match value {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        };

        let mut next = self.clone();
        match name {
            "key_color" => match value {
                ParamValue::Color([r, g, b, _]) => {
                    next.key_color = Rgb::new(*r, *g, *b);
                }
                _ => return Err(mismatch()),
            },
            "output_mode" => match value {
                ParamValue::Int(i) => {
                    let index = u8::try_from(*i).map_err(|_| mismatch())?;
                    next.output_mode = OutputMode::try_from(index)?;
                }
                _ => return Err(mismatch()),
            },
            _ => {
                let v = scalar.ok_or_else(mismatch)?;
                let (_, slot, _) = next
                    .scalars_mut()
                    .into_iter()
                    .find(|(n, _, _)| *n == name)
                    .ok_or_else(|| KeyerError::InvalidParameter(format!("unknown parameter {name}")))?;
                *slot = v;
            }
        }
        *self = next.sanitized()?;
        Ok(())
    }
}

fn float_param(name: &str, display: &str, default: f32, range: ParamRange) -> ParamDescriptor {
    ParamDescriptor {
        name: name.into(),
        display_name: display.into(),
        default: ParamValue::Float(default),
        min: Some(ParamValue::Float(range.min)),
        max: Some(ParamValue::Float(range.max)),
    }
}

/// Descriptors for every control, in the order a keyer panel shows them.
pub fn descriptors() -> Vec<ParamDescriptor> {
    let d = KeyingParameters::default();
    let k = d.key_color;
    vec![
        ParamDescriptor {
            name: "key_color".into(),
            display_name: "Key Color".into(),
            default: ParamValue::Color([k.r, k.g, k.b, 1.0]),
            min: None,
            max: None,
        },
        float_param("transparency", "Transparency", d.transparency, PERCENT_RANGE),
        float_param("tolerance", "Tolerance", d.tolerance, PERCENT_RANGE),
        float_param("highlight", "Highlight", d.highlight, PERCENT_RANGE),
        float_param("shadow", "Shadow", d.shadow, PERCENT_RANGE),
        float_param("pedestal", "Pedestal", d.pedestal, PERCENT_RANGE),
        float_param("spill_suppression", "Spill Suppression", d.spill_suppression, PERCENT_RANGE),
        float_param("contrast", "Contrast", d.contrast, CONTRAST_RANGE),
        float_param("mid_point", "Mid Point", d.mid_point, PERCENT_RANGE),
        float_param("choke", "Choke", d.choke, CHOKE_RANGE),
        float_param("soften", "Soften", d.soften, SOFTEN_RANGE),
        ParamDescriptor {
            name: "output_mode".into(),
            display_name: "Output".into(),
            default: ParamValue::Int(d.output_mode.index() as i32),
            min: Some(ParamValue::Int(0)),
            max: Some(ParamValue::Int(2)),
        },
    ]
}

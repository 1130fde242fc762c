//! UltraKey Effects - chroma key matte generation and cleanup
//!
//! Provides the keyer pipeline (matte generation, contrast, choke/soften,
//! spill suppression, output selection), parameter descriptors, presets,
//! and a concurrent parameter store.

pub mod chroma_key;
pub mod presets;
pub mod store;

pub use chroma_key::params::{descriptors, KeyingParameters, OutputMode, STANDARD_GREEN};
pub use chroma_key::{key_frame, ChromaKeyProcessor};
pub use presets::{Preset, PresetLibrary};
pub use store::ParameterStore;

use serde::{Deserialize, Serialize};

/// Effect parameter types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Color([f32; 4]),
}

/// Effect parameter descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub display_name: String,
    pub default: ParamValue,
    pub min: Option<ParamValue>,
    pub max: Option<ParamValue>,
}

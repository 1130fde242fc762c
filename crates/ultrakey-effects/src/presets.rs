//! Named parameter presets.
//!
//! A preset is just a complete `KeyingParameters` value with a name. The
//! library starts with the built-ins and can be extended from JSON:
//!
//! ```text
//! {
//!   "studio-a": { "description": "...", "params": { "tolerance": 60, ... } },
//!   ...
//! }
//! ```
//!
//! Missing parameter fields take their defaults.

use crate::chroma_key::params::{KeyingParameters, STANDARD_GREEN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;
use ultrakey_core::{KeyerError, Result, Rgb};

/// Standard chroma blue backdrop.
pub const STANDARD_BLUE: Rgb = Rgb::new(0.0, 0.278, 0.733);

/// A named parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub params: KeyingParameters,
}

#[derive(Serialize, Deserialize)]
struct PresetEntry {
    #[serde(default)]
    description: String,
    params: KeyingParameters,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        params: KeyingParameters,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params,
        }
    }

    /// Batch driver defaults on a standard green screen.
    pub fn default_key() -> Self {
        Self::new("default", "Standard green, default controls", KeyingParameters::default())
    }

    /// Evenly lit green screen: slightly wider tolerance, more spill removal.
    pub fn green_screen() -> Self {
        Self::new(
            "green-screen",
            "Evenly lit green screen",
            KeyingParameters {
                key_color: STANDARD_GREEN,
                tolerance: 55.0,
                spill_suppression: 50.0,
                contrast: 20.0,
                ..KeyingParameters::default()
            },
        )
    }

    /// Standard blue screen.
    pub fn blue_screen() -> Self {
        Self::new(
            "blue-screen",
            "Standard blue screen",
            KeyingParameters {
                key_color: STANDARD_BLUE,
                tolerance: 55.0,
                spill_suppression: 40.0,
                contrast: 20.0,
                ..KeyingParameters::default()
            },
        )
    }

    /// Keeps wispy edges: low transparency, no choke, light soften.
    pub fn fine_hair() -> Self {
        Self::new(
            "fine-hair",
            "Preserve fine hair and semi-transparent edges",
            KeyingParameters {
                transparency: 40.0,
                tolerance: 45.0,
                highlight: 55.0,
                spill_suppression: 60.0,
                soften: 2.0,
                ..KeyingParameters::default()
            },
        )
    }

    /// Solid subjects: steep contrast and a small choke.
    pub fn hard_edge() -> Self {
        Self::new(
            "hard-edge",
            "Crisp edges for solid subjects",
            KeyingParameters {
                transparency: 60.0,
                contrast: 150.0,
                choke: 3.0,
                ..KeyingParameters::default()
            },
        )
    }
}

/// Presets by name, sorted.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: BTreeMap<String, Preset>,
}

impl PresetLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the built-in presets.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        for preset in [
            Preset::default_key(),
            Preset::green_screen(),
            Preset::blue_screen(),
            Preset::fine_hair(),
            Preset::hard_edge(),
        ] {
            lib.insert(preset);
        }
        lib
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, preset: Preset) {
        self.presets.insert(preset.name.clone(), preset);
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Parameters of a preset, or `InvalidParameter` naming the known presets.
    pub fn params(&self, name: &str) -> Result<KeyingParameters> {
        self.get(name).map(|p| p.params.clone()).ok_or_else(|| {
            KeyerError::InvalidParameter(format!(
                "unknown preset {name} (known: {})",
                self.names().join(", ")
            ))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Merge presets from a JSON object. Each loaded preset is sanitized;
    /// returns how many were added or replaced.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let entries: BTreeMap<String, PresetEntry> = serde_json::from_str(json)
            .map_err(|e| KeyerError::Serialization(format!("Failed to parse presets: {e}")))?;
        let count = entries.len();
        for (name, entry) in entries {
            let params = entry.params.sanitized()?;
            self.insert(Preset::new(name, entry.description, params));
        }
        info!(count, total = self.len(), "loaded presets");
        Ok(count)
    }

    /// Merge presets from a JSON file.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)?;
        self.load_json(&json)
    }

    /// Serialize every preset in the `load_json` format.
    pub fn to_json(&self) -> Result<String> {
        let entries: BTreeMap<&str, PresetEntry> = self
            .presets
            .values()
            .map(|p| {
                (
                    p.name.as_str(),
                    PresetEntry {
                        description: p.description.clone(),
                        params: p.params.clone(),
                    },
                )
            })
            .collect();
        serde_json::to_string_pretty(&entries)
            .map_err(|e| KeyerError::Serialization(format!("Failed to serialize presets: {e}")))
    }
}

//! Shared parameter holder for a UI thread and a keying thread.
//!
//! Writers build a complete new parameter value and swap it in; readers take
//! an `Arc` snapshot once per frame and never see a half-applied change.

use crate::chroma_key::params::KeyingParameters;
use crate::presets::PresetLibrary;
use crate::ParamValue;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use ultrakey_core::Result;

/// Concurrently updatable keyer parameters. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    current: Arc<RwLock<Arc<KeyingParameters>>>,
}

impl ParameterStore {
    /// Store holding `params`, validated first.
    pub fn new(params: KeyingParameters) -> Result<Self> {
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(params.sanitized()?))),
        })
    }

    /// Immutable view of the current parameters, for one frame.
    pub fn snapshot(&self) -> Arc<KeyingParameters> {
        Arc::clone(&self.current.read())
    }

    /// Replace every parameter. On error the store is unchanged.
    pub fn replace(&self, params: KeyingParameters) -> Result<()> {
        let params = Arc::new(params.sanitized()?);
        *self.current.write() = params;
        Ok(())
    }

    /// Edit a copy of the current parameters and swap it in.
    ///
    /// The write lock is held across `f` so concurrent updates do not lose
    /// each other's changes.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut KeyingParameters),
    {
        let mut guard = self.current.write();
        let mut next = KeyingParameters::clone(&guard);
        f(&mut next);
        *guard = Arc::new(next.sanitized()?);
        Ok(())
    }

    /// Set one control by descriptor name.
    pub fn set_param(&self, name: &str, value: &ParamValue) -> Result<()> {
        let mut guard = self.current.write();
        let mut next = KeyingParameters::clone(&guard);
        next.set_param(name, value)?;
        *guard = Arc::new(next);
        debug!(param = name, ?value, "parameter updated");
        Ok(())
    }

    /// Load a named preset from `library`.
    pub fn apply_preset(&self, library: &PresetLibrary, name: &str) -> Result<()> {
        self.replace(library.params(name)?)?;
        debug!(preset = name, "preset applied");
        Ok(())
    }
}

//! Integration test crate for UltraKey.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives ultrakey-effects with frames and pixels built from ultrakey-core.

#[cfg(test)]
mod keying;

#[cfg(test)]
mod pipeline;

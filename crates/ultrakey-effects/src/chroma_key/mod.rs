//! Chroma key pipeline.
//!
//! A frame is keyed in three passes:
//! 1. matte generation + contrast, per pixel, into a materialized matte
//! 2. choke then soften over that matte (needs all of pass 1)
//! 3. spill suppression + output selection, per pixel
//!
//! Each pass is row-parallel; the pass boundaries are the only barriers.

pub mod contrast;
pub mod matte;
pub mod morphology;
pub mod output;
pub mod params;
pub mod spill;

use std::time::Instant;

use contrast::ContrastCurve;
use matte::MatteGenerator;
use params::KeyingParameters;
use rayon::prelude::*;
use spill::SpillSuppressor;
use tracing::debug;
use ultrakey_core::{AlphaMatte, Frame, KeyerError, Result, Rgb, Rgba, RgbaFrame};

/// Keyer bound to one sanitized parameter snapshot.
///
/// Stateless between frames: the same processor can key any number of
/// frames, from any number of threads.
#[derive(Debug, Clone)]
pub struct ChromaKeyProcessor {
    params: KeyingParameters,
    matte: MatteGenerator,
    contrast: ContrastCurve,
    spill: SpillSuppressor,
}

impl ChromaKeyProcessor {
    /// Validate `params` and precompute per-snapshot constants.
    pub fn new(params: &KeyingParameters) -> Result<Self> {
        let params = params.sanitized()?;
        Ok(Self {
            matte: MatteGenerator::new(&params),
            contrast: ContrastCurve::new(params.contrast, params.mid_point),
            spill: SpillSuppressor::new(&params),
            params,
        })
    }

    pub fn params(&self) -> &KeyingParameters {
        &self.params
    }

    /// Matte + contrast for a single pixel, before morphology.
    ///
    /// Channels outside [0,1] are clamped first.
    #[inline]
    pub fn pixel_alpha(&self, pixel: Rgb) -> f32 {
        self.contrast.apply(self.matte.alpha(pixel.saturate()))
    }

    /// Key a single pixel with no neighborhood (choke and soften skipped).
    pub fn key_pixel(&self, pixel: Rgb) -> Rgba {
        let alpha = self.pixel_alpha(pixel);
        self.finish_pixel(pixel, alpha)
    }

    #[inline]
    fn finish_pixel(&self, pixel: Rgb, alpha: f32) -> Rgba {
        let color = self.spill.apply(pixel.saturate(), alpha);
        output::select_output(color, alpha, self.params.output_mode)
    }

    /// Pass 1: raw alpha with contrast applied, for every pixel.
    pub fn extract_matte(&self, frame: &Frame) -> Result<AlphaMatte> {
        frame.validate()?;
        let width = frame.width() as usize;
        let mut matte = AlphaMatte::filled(frame.width(), frame.height(), 0.0);
        matte
            .data
            .par_chunks_mut(width)
            .zip(frame.pixels().par_chunks(width))
            .for_each(|(alpha_row, pixel_row)| {
                for (a, p) in alpha_row.iter_mut().zip(pixel_row) {
                    *a = self.pixel_alpha(*p);
                }
            });
        Ok(matte)
    }

    /// Pass 2: choke then soften.
    pub fn refine_matte(&self, matte: &AlphaMatte) -> AlphaMatte {
        morphology::refine(matte, self.params.choke, self.params.soften)
    }

    /// Pass 3: spill suppression and output selection against a final matte.
    pub fn apply_matte(&self, frame: &Frame, matte: &AlphaMatte) -> Result<RgbaFrame> {
        if matte.width != frame.width() || matte.height != frame.height() {
            return Err(KeyerError::MalformedFrame(format!(
                "matte is {}x{}, frame is {}x{}",
                matte.width,
                matte.height,
                frame.width(),
                frame.height()
            )));
        }
        let pixels: Vec<Rgba> = frame
            .pixels()
            .par_iter()
            .zip(matte.data.par_iter())
            .map(|(p, a)| self.finish_pixel(*p, *a))
            .collect();
        Ok(RgbaFrame {
            width: frame.width(),
            height: frame.height(),
            pixels,
        })
    }

    /// Full pipeline for one frame.
    pub fn process(&self, frame: &Frame) -> Result<RgbaFrame> {
        let start = Instant::now();
        let raw = self.extract_matte(frame)?;
        let matte_done = Instant::now();
        let refined = self.refine_matte(&raw);
        let refine_done = Instant::now();
        let out = self.apply_matte(frame, &refined)?;

        debug!(
            width = frame.width(),
            height = frame.height(),
            matte_us = (matte_done - start).as_micros() as u64,
            refine_us = (refine_done - matte_done).as_micros() as u64,
            output_us = refine_done.elapsed().as_micros() as u64,
            coverage = refined.coverage(),
            "keyed frame"
        );
        Ok(out)
    }
}

/// Key one frame with a parameter snapshot.
pub fn key_frame(frame: &Frame, params: &KeyingParameters) -> Result<RgbaFrame> {
    ChromaKeyProcessor::new(params)?.process(frame)
}

//! Per-pixel keying behavior across the whole pipeline.
//!
//! Exercises ultrakey-core color conversion through the ultrakey-effects
//! matte, contrast, spill and output stages.

use proptest::prelude::*;
use ultrakey_core::{Hsv, KeyerError, Rgb, Rgba};
use ultrakey_effects::chroma_key::contrast::apply_contrast;
use ultrakey_effects::chroma_key::matte::MatteGenerator;
use ultrakey_effects::chroma_key::output::{select_output, StatusBand};
use ultrakey_effects::chroma_key::spill::suppress_spill;
use ultrakey_effects::{ChromaKeyProcessor, KeyingParameters, OutputMode, STANDARD_GREEN};

// ── Helpers ────────────────────────────────────────────────────

const RED_SUBJECT: Rgb = Rgb::new(0.9, 0.1, 0.1);

fn processor(params: KeyingParameters) -> ChromaKeyProcessor {
    ChromaKeyProcessor::new(&params).unwrap()
}

fn neutral() -> KeyingParameters {
    KeyingParameters::neutral()
}

// ── Matte generation ───────────────────────────────────────────

#[test]
fn key_color_is_fully_transparent_at_neutral() {
    let p = processor(neutral());
    assert_eq!(p.pixel_alpha(STANDARD_GREEN), 0.0);
    assert_eq!(p.key_pixel(STANDARD_GREEN).a, 0.0);
}

#[test]
fn distant_color_is_fully_opaque_at_neutral() {
    let p = processor(neutral().with_key_color(Rgb::GREEN));
    assert_eq!(p.pixel_alpha(Rgb::RED), 1.0);
}

#[test]
fn hue_wraparound_keys_reds_together() {
    let key = Hsv::new(0.02, 0.9, 0.8).to_rgb();
    let pixel = Hsv::new(0.98, 0.9, 0.8).to_rgb();
    let p = processor(neutral().with_key_color(key));
    assert_eq!(p.pixel_alpha(pixel), 0.0);

    // A pixel half the wheel away is far.
    let opposite = Hsv::new(0.52, 0.9, 0.8).to_rgb();
    assert_eq!(p.pixel_alpha(opposite), 1.0);
}

#[test]
fn achromatic_pixels_never_produce_nan() {
    for key in [Rgb::BLACK, Rgb::WHITE, STANDARD_GREEN] {
        let p = processor(KeyingParameters::default().with_key_color(key));
        for v in [0.0, 0.25, 0.5, 1.0] {
            let out = p.key_pixel(Rgb::new(v, v, v));
            assert!(out.r.is_finite() && out.a.is_finite(), "key {key:?} gray {v}");
            assert!((0.0..=1.0).contains(&out.a));
        }
    }
}

proptest! {
    #[test]
    fn alpha_is_monotonic_in_weighted_distance(
        tolerance in 0.0f32..=100.0,
        a in prop::array::uniform3(0.0f32..=1.0),
        b in prop::array::uniform3(0.0f32..=1.0),
    ) {
        let params = KeyingParameters { tolerance, ..neutral() };
        let generator = MatteGenerator::new(&params);
        let (pa, pb) = (Rgb::from(a), Rgb::from(b));
        let (near, far) = if generator.distance(pa) <= generator.distance(pb) {
            (pa, pb)
        } else {
            (pb, pa)
        };
        prop_assert!(generator.alpha(near) <= generator.alpha(far));
    }

    #[test]
    fn contrast_keeps_the_mid_point_fixed(contrast in 1.5f32..=200.0, mid in 0.0f32..=100.0) {
        let pivot = mid / 100.0;
        prop_assert!((apply_contrast(pivot, contrast, mid) - pivot).abs() < 1e-5);
    }

    #[test]
    fn every_stage_output_stays_in_range(
        pixel in prop::array::uniform3(0.0f32..=1.0),
        transparency in 0.0f32..=100.0,
        highlight in 0.0f32..=100.0,
        shadow in 0.0f32..=100.0,
        pedestal in 0.0f32..=100.0,
        spill in 0.0f32..=100.0,
        contrast in 0.0f32..=200.0,
    ) {
        let p = processor(KeyingParameters {
            transparency,
            highlight,
            shadow,
            pedestal,
            spill_suppression: spill,
            contrast,
            ..KeyingParameters::default()
        });
        let out = p.key_pixel(Rgb::from(pixel));
        for c in [out.r, out.g, out.b, out.a] {
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}

// ── Spill ──────────────────────────────────────────────────────

#[test]
fn zero_spill_leaves_color_untouched() {
    let key_hue = STANDARD_GREEN.to_hsv().h;
    let c = Rgb::new(0.35, 0.7, 0.3);
    assert_eq!(suppress_spill(c, 1.0, key_hue, 0.0), c);

    let p = processor(neutral());
    assert_eq!(p.key_pixel(c).rgb(), c);
}

#[test]
fn full_spill_on_key_hue_drives_green_to_luma() {
    let key_hue = STANDARD_GREEN.to_hsv().h;
    let pixel = Hsv::new(key_hue, 0.8, 0.9).to_rgb();
    let out = suppress_spill(pixel, 1.0, key_hue, 100.0);
    assert!((out.g - pixel.luma()).abs() < 1e-6);
}

// ── Output selection ───────────────────────────────────────────

#[test]
fn status_bands_partition_alpha() {
    let mut previous = StatusBand::Transparent;
    let order = [
        StatusBand::Transparent,
        StatusBand::Poor,
        StatusBand::Marginal,
        StatusBand::Acceptable,
        StatusBand::Opaque,
    ];
    for i in 0..=1000 {
        let band = StatusBand::from_alpha(i as f32 / 1000.0);
        let rank = |b: StatusBand| order.iter().position(|o| *o == b).unwrap();
        assert!(rank(band) >= rank(previous), "bands must not go backwards");
        previous = band;
    }
    assert_eq!(StatusBand::from_alpha(0.05), StatusBand::Poor);
    assert_eq!(StatusBand::from_alpha(0.95), StatusBand::Opaque);
}

#[test]
fn status_colors_are_pinned() {
    let status = |a| select_output(Rgb::GREEN, a, OutputMode::Status);
    assert_eq!(status(0.0), Rgba::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(status(0.2), Rgba::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(status(0.5), Rgba::new(1.0, 1.0, 0.0, 1.0));
    assert_eq!(status(0.8), Rgba::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(status(1.0), Rgba::new(1.0, 1.0, 1.0, 1.0));
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn standard_green_pixel_renders_black_in_alpha_mode() {
    let p = processor(KeyingParameters::default().with_output_mode(OutputMode::Alpha));
    assert_eq!(p.pixel_alpha(STANDARD_GREEN), 0.0);
    assert_eq!(p.key_pixel(STANDARD_GREEN), Rgba::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn red_subject_renders_ideal_opaque_in_status_mode() {
    let p = processor(KeyingParameters::default().with_output_mode(OutputMode::Status));
    assert!((p.pixel_alpha(RED_SUBJECT) - 1.0).abs() < 1e-6);
    assert_eq!(p.key_pixel(RED_SUBJECT), StatusBand::Opaque.color().with_alpha(1.0));
}

// ── Validation ─────────────────────────────────────────────────

#[test]
fn non_finite_parameters_are_rejected() {
    for params in [
        KeyingParameters {
            transparency: f32::NAN,
            ..KeyingParameters::default()
        },
        KeyingParameters {
            choke: f32::NEG_INFINITY,
            ..KeyingParameters::default()
        },
    ] {
        assert!(matches!(
            ChromaKeyProcessor::new(&params),
            Err(KeyerError::InvalidParameter(_))
        ));
    }
}

#[test]
fn out_of_range_parameters_are_clamped() {
    let p = processor(KeyingParameters {
        contrast: 900.0,
        choke: -50.0,
        ..KeyingParameters::default()
    });
    assert_eq!(p.params().contrast, 200.0);
    assert_eq!(p.params().choke, -20.0);
}

//! Frame-level keying: matte passes, presets and the shared parameter store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use ultrakey_core::{AlphaMatte, Frame, KeyerError, Rgb};
use ultrakey_effects::chroma_key::morphology;
use ultrakey_effects::{
    key_frame, ChromaKeyProcessor, KeyingParameters, OutputMode, ParamValue, ParameterStore,
    PresetLibrary, STANDARD_GREEN,
};

// ── Helpers ────────────────────────────────────────────────────

const SUBJECT: Rgb = Rgb::new(0.85, 0.2, 0.15);

/// 24x16 green frame with a subject block over columns 6..18, rows 4..12.
fn subject_frame() -> Frame {
    let mut frame = Frame::solid(24, 16, STANDARD_GREEN).unwrap();
    for y in 4..12 {
        for x in 6..18 {
            *frame.get_mut(x, y) = SUBJECT;
        }
    }
    frame
}

fn alphas(frame: &Frame, params: KeyingParameters) -> AlphaMatte {
    let out = key_frame(frame, &params).unwrap();
    let data = out.pixels.iter().map(|p| p.a).collect();
    AlphaMatte::from_vec(out.width, out.height, data).unwrap()
}

// ── Matte passes ───────────────────────────────────────────────

#[test]
fn frame_output_matches_explicit_passes() {
    let frame = subject_frame();
    let params = KeyingParameters {
        choke: -8.0,
        soften: 3.0,
        ..KeyingParameters::default()
    };
    let p = ChromaKeyProcessor::new(&params).unwrap();

    let raw = p.extract_matte(&frame).unwrap();
    let refined = morphology::soften(&morphology::choke(&raw, -8.0), 3.0);
    let expected = p.apply_matte(&frame, &refined).unwrap();

    assert_eq!(p.process(&frame).unwrap(), expected);
}

#[test]
fn zero_choke_and_soften_match_per_pixel_keying() {
    let frame = subject_frame();
    let p = ChromaKeyProcessor::new(&KeyingParameters::default()).unwrap();
    let out = p.process(&frame).unwrap();
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            assert_eq!(out.get(x, y), p.key_pixel(frame.get(x, y)));
        }
    }
}

#[test]
fn choke_shrinks_and_dilate_grows_the_subject() {
    let frame = subject_frame();
    let opaque = |m: &AlphaMatte| m.data.iter().filter(|&&a| a > 0.5).count();

    let plain = alphas(&frame, KeyingParameters::neutral());
    let eroded = alphas(
        &frame,
        KeyingParameters {
            choke: 7.0,
            ..KeyingParameters::neutral()
        },
    );
    let dilated = alphas(
        &frame,
        KeyingParameters {
            choke: -7.0,
            ..KeyingParameters::neutral()
        },
    );

    assert_eq!(opaque(&plain), 12 * 8);
    // Radius ceil(7 * 0.15) = 2 on each side.
    assert_eq!(opaque(&eroded), 8 * 4);
    assert_eq!(opaque(&dilated), 16 * 12);
}

#[test]
fn soften_creates_a_gradient_only_near_edges() {
    let frame = subject_frame();
    let soft = alphas(
        &frame,
        KeyingParameters {
            soften: 4.0,
            ..KeyingParameters::neutral()
        },
    );
    // Radius 2: far corners stay clean, the block center stays solid.
    assert_eq!(soft.get(0, 0), 0.0);
    assert!((soft.get(11, 8) - 1.0).abs() < 1e-6);
    let edge = soft.get(6, 8);
    assert!(edge > 0.2 && edge < 0.9, "edge alpha {edge}");
    assert!(soft.data.iter().all(|a| (0.0..=1.0).contains(a)));
}

#[test]
fn vanishing_soften_leaves_the_matte_finite() {
    let frame = subject_frame();
    let plain = alphas(&frame, KeyingParameters::neutral());
    let tiny = alphas(
        &frame,
        KeyingParameters {
            soften: 1e-30,
            ..KeyingParameters::neutral()
        },
    );
    assert!(tiny.data.iter().all(|a| a.is_finite()));
    assert_eq!(tiny, plain);
}

#[test]
fn out_of_range_channels_key_like_their_clamped_values() {
    let mut wild = subject_frame();
    let mut clamped = subject_frame();
    *wild.get_mut(8, 6) = Rgb::new(-0.5, 0.2, 0.1);
    *clamped.get_mut(8, 6) = Rgb::new(0.0, 0.2, 0.1);
    *wild.get_mut(2, 2) = Rgb::new(0.1, 1.7, 0.1);
    *clamped.get_mut(2, 2) = Rgb::new(0.1, 1.0, 0.1);

    let params = KeyingParameters {
        soften: 2.0,
        ..KeyingParameters::neutral()
    };
    let out = key_frame(&wild, &params).unwrap();
    assert_eq!(out, key_frame(&clamped, &params).unwrap());
    assert_eq!(out.get(8, 6).r, 0.0);
}

#[test]
fn malformed_frames_are_rejected() {
    assert!(matches!(
        Frame::new(0, 4, Vec::new()),
        Err(KeyerError::MalformedFrame(_))
    ));
    assert!(Frame::new(2, 2, vec![Rgb::BLACK; 3]).is_err());

    let mut frame = subject_frame();
    *frame.get_mut(3, 3) = Rgb::new(0.0, f32::NAN, 0.0);
    let err = key_frame(&frame, &KeyingParameters::default()).unwrap_err();
    assert!(err.to_string().contains("(3, 3)"), "{err}");
}

// ── Presets ────────────────────────────────────────────────────

#[test]
fn green_presets_clear_a_green_backdrop() {
    let backdrop = Frame::solid(8, 8, STANDARD_GREEN).unwrap();
    let lib = PresetLibrary::builtin();
    for name in ["default", "green-screen", "fine-hair", "hard-edge"] {
        let out = key_frame(&backdrop, &lib.params(name).unwrap()).unwrap();
        assert!(out.pixels.iter().all(|p| p.a == 0.0), "preset {name}");
    }
}

#[test]
fn blue_preset_keeps_green_subjects() {
    let frame = Frame::solid(4, 4, STANDARD_GREEN).unwrap();
    let params = PresetLibrary::builtin().params("blue-screen").unwrap();
    let out = key_frame(&frame, &params).unwrap();
    assert!(out.pixels.iter().all(|p| p.a > 0.95));
}

// ── Parameter store ────────────────────────────────────────────

#[test]
fn each_frame_sees_one_consistent_snapshot() {
    let store = ParameterStore::default();
    let frame = Frame::solid(32, 32, SUBJECT).unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = store.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut mode = 0;
            while !stop.load(Ordering::Relaxed) {
                mode = (mode + 1) % 3;
                store
                    .set_param("output_mode", &ParamValue::Int(mode))
                    .unwrap();
            }
        })
    };

    for _ in 0..50 {
        let snapshot = store.snapshot();
        let out = key_frame(&frame, &snapshot).unwrap();
        let first = out.pixels[0];
        assert!(out.pixels.iter().all(|p| *p == first));
        let expected = ChromaKeyProcessor::new(&snapshot)
            .unwrap()
            .key_pixel(SUBJECT);
        assert_eq!(first, expected);
    }

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn store_updates_apply_to_the_next_frame() {
    let store = ParameterStore::default();
    let frame = Frame::solid(4, 4, STANDARD_GREEN).unwrap();

    let before = key_frame(&frame, &store.snapshot()).unwrap();
    assert_eq!(before.pixels[0].a, 0.0);

    store
        .update(|p| {
            p.pedestal = 50.0;
            p.output_mode = OutputMode::Status;
        })
        .unwrap();
    let after = key_frame(&frame, &store.snapshot()).unwrap();
    // Pedestal 50 lifts alpha to 0.5: the marginal (yellow) band.
    assert_eq!(after.pixels[0], Rgb::YELLOW.with_alpha(1.0));
}

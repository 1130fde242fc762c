//! Still-image and frame-sequence I/O for the batch keyer.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use ultrakey_core::{Frame, RgbaFrame};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decode an image file into a float frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::ImageReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Frame::from_rgb8(w, h, img.as_raw())
        .with_context(|| format!("building frame from {}", path.display()))
}

/// Write an RGBA frame as 8-bit RGBA; the format follows the extension.
pub fn save_rgba(frame: &RgbaFrame, path: &Path) -> Result<()> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_rgba8())
        .context("RGBA buffer does not match frame size")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Opaque copy of a frame, for writing flattened composites.
pub fn opaque(frame: &Frame) -> RgbaFrame {
    RgbaFrame {
        width: frame.width(),
        height: frame.height(),
        pixels: frame.pixels().iter().map(|p| p.with_alpha(1.0)).collect(),
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAME_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Image files in `dir`, sorted by name.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if is_frame_file(&path) {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

/// Output name of the `index`th frame in a sequence.
pub fn sequence_name(index: usize) -> String {
    format!("frame_{index:06}.png")
}

/// Nearest-neighbor resample to `width` x `height`.
pub fn resize_nearest(frame: &Frame, width: u32, height: u32) -> Result<Frame> {
    if frame.width() == width && frame.height() == height {
        return Ok(frame.clone());
    }
    let pixels = (0..height)
        .flat_map(|y| {
            let sy = ((y as u64 * frame.height() as u64) / height as u64) as u32;
            (0..width).map(move |x| {
                let sx = ((x as u64 * frame.width() as u64) / width as u64) as u32;
                frame.get(sx, sy)
            })
        })
        .collect();
    Ok(Frame::new(width, height, pixels)?)
}

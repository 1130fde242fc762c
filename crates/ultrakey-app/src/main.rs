//! UltraKey - batch chroma keyer
//!
//! Keys still images or directories of frames and writes RGBA PNGs.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ultrakey_core::{Frame, Rgb};
use ultrakey_effects::{
    descriptors, ChromaKeyProcessor, KeyingParameters, OutputMode, ParamValue, ParameterStore,
    PresetLibrary,
};

mod frames;

/// Log progress every this many frames.
const PROGRESS_INTERVAL: usize = 30;

#[derive(Parser)]
#[command(name = "ultrakey")]
#[command(author, version, about = "Chroma keyer for stills and frame sequences")]
#[command(long_about = "
Removes a solid-color backdrop and writes RGBA PNGs.

Examples:
  ultrakey key shot.png -o keyed.png
  ultrakey key frames/ -o keyed/ --preset fine-hair --choke 2
  ultrakey key shot.png -o check.png --output-mode 2
  ultrakey key shot.png -o comp.png --background beach.jpg
  ultrakey presets > presets.json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Key an image or a directory of frames
    Key(KeyArgs),

    /// Print the built-in presets as JSON
    Presets,

    /// List every keyer control with its range and default
    Params,
}

#[derive(Args)]
struct KeyArgs {
    /// Input image, or a directory of png/jpg frames
    input: PathBuf,

    /// Output PNG, or a directory for frame_NNNNNN.png files
    #[arg(short, long)]
    output: PathBuf,

    /// Start from a named preset
    #[arg(long)]
    preset: Option<String>,

    /// JSON file of parameters (camelCase keys) applied over the preset
    #[arg(long)]
    params: Option<PathBuf>,

    /// Flatten the result over this image
    #[arg(long)]
    background: Option<PathBuf>,

    /// Key color as three 0-1 floats
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    key_color: Option<Vec<f32>>,

    /// Transparency (0-100)
    #[arg(short, long)]
    transparency: Option<f32>,

    /// Tolerance (0-100)
    #[arg(long)]
    tolerance: Option<f32>,

    /// Highlight (0-100)
    #[arg(long)]
    highlight: Option<f32>,

    /// Shadow (0-100)
    #[arg(long)]
    shadow: Option<f32>,

    /// Pedestal (0-100)
    #[arg(long)]
    pedestal: Option<f32>,

    /// Spill suppression (0-100)
    #[arg(long)]
    spill_suppression: Option<f32>,

    /// Contrast (0-200)
    #[arg(long)]
    contrast: Option<f32>,

    /// Mid point (0-100), pivot for contrast
    #[arg(long)]
    mid_point: Option<f32>,

    /// Choke (-20 to 20), positive shrinks the matte
    #[arg(long, allow_negative_numbers = true)]
    choke: Option<f32>,

    /// Soften (0-20)
    #[arg(long)]
    soften: Option<f32>,

    /// 0 = composite, 1 = alpha, 2 = status
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    output_mode: Option<u8>,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Key(args) => run_key(&args),
        Commands::Presets => {
            println!("{}", PresetLibrary::builtin().to_json()?);
            Ok(())
        }
        Commands::Params => {
            print_params();
            Ok(())
        }
    }
}

fn print_params() {
    fn fmt_value(v: &ParamValue) -> String {
        match v {
            ParamValue::Float(f) => format!("{f}"),
            ParamValue::Int(i) => format!("{i}"),
            ParamValue::Color([r, g, b, _]) => format!("({r}, {g}, {b})"),
        }
    }
    println!("{:<18} {:<18} {:>10} {:>22}", "NAME", "DISPLAY", "RANGE", "DEFAULT");
    for d in descriptors() {
        let range = match (&d.min, &d.max) {
            (Some(lo), Some(hi)) => format!("{}..{}", fmt_value(lo), fmt_value(hi)),
            _ => "-".to_string(),
        };
        println!(
            "{:<18} {:<18} {:>10} {:>22}",
            d.name,
            d.display_name,
            range,
            fmt_value(&d.default)
        );
    }
}

/// Preset, then parameter file, then explicit flags.
fn resolve_params(args: &KeyArgs) -> Result<KeyingParameters> {
    let mut params = match &args.preset {
        Some(name) => PresetLibrary::builtin().params(name)?,
        None => KeyingParameters::default(),
    };

    if let Some(path) = &args.params {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let overlay: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        let serde_json::Value::Object(overlay) = overlay else {
            bail!("{} must contain a JSON object", path.display());
        };
        let mut base = serde_json::to_value(&params)?;
        if let serde_json::Value::Object(fields) = &mut base {
            fields.extend(overlay);
        }
        params = serde_json::from_value(base)
            .with_context(|| format!("invalid parameters in {}", path.display()))?;
    }

    if let Some(c) = &args.key_color {
        params.key_color = Rgb::new(c[0], c[1], c[2]);
    }
    let overrides = [
        (&mut params.transparency, args.transparency),
        (&mut params.tolerance, args.tolerance),
        (&mut params.highlight, args.highlight),
        (&mut params.shadow, args.shadow),
        (&mut params.pedestal, args.pedestal),
        (&mut params.spill_suppression, args.spill_suppression),
        (&mut params.contrast, args.contrast),
        (&mut params.mid_point, args.mid_point),
        (&mut params.choke, args.choke),
        (&mut params.soften, args.soften),
    ];
    for (slot, value) in overrides {
        if let Some(v) = value {
            *slot = v;
        }
    }
    if let Some(mode) = args.output_mode {
        params.output_mode = OutputMode::try_from(mode)?;
    }
    Ok(params)
}

/// Background frame resized to the keyed frame, cached between frames of
/// the same size.
struct Background {
    source: Frame,
    fitted: Option<Frame>,
}

impl Background {
    fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            source: frames::load_frame(path)?,
            fitted: None,
        })
    }

    fn fitted(&mut self, width: u32, height: u32) -> Result<&Frame> {
        let stale = self
            .fitted
            .as_ref()
            .map_or(true, |f| f.width() != width || f.height() != height);
        if stale {
            self.fitted = Some(frames::resize_nearest(&self.source, width, height)?);
        }
        self.fitted.as_ref().context("background not prepared")
    }
}

fn run_key(args: &KeyArgs) -> Result<()> {
    let store = ParameterStore::new(resolve_params(args)?)?;
    let params = store.snapshot();
    info!(
        key_color = ?params.key_color,
        transparency = params.transparency,
        tolerance = params.tolerance,
        spill = params.spill_suppression,
        choke = params.choke,
        soften = params.soften,
        mode = params.output_mode.display_name(),
        "keyer configured"
    );

    let mut background = args.background.as_deref().map(Background::load).transpose()?;

    let jobs: Vec<(PathBuf, PathBuf)> = if args.input.is_dir() {
        let inputs = frames::list_frames(&args.input)?;
        if inputs.is_empty() {
            bail!("no png/jpg frames in {}", args.input.display());
        }
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("creating {}", args.output.display()))?;
        inputs
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, args.output.join(frames::sequence_name(i))))
            .collect()
    } else {
        if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        vec![(args.input.clone(), args.output.clone())]
    };

    let total = jobs.len();
    info!(frames = total, input = %args.input.display(), "processing");
    let start = Instant::now();

    for (index, (input, output)) in jobs.iter().enumerate() {
        // One snapshot per frame; the store may change between frames.
        let processor = ChromaKeyProcessor::new(&store.snapshot())?;
        let frame = frames::load_frame(input)?;
        let keyed = processor
            .process(&frame)
            .with_context(|| format!("keying {}", input.display()))?;

        match background.as_mut() {
            Some(bg) => {
                let bg = bg.fitted(keyed.width, keyed.height)?;
                let flat = keyed.composite_over(bg)?;
                frames::save_rgba(&frames::opaque(&flat), output)?;
            }
            None => frames::save_rgba(&keyed, output)?,
        }
        debug!(input = %input.display(), output = %output.display(), "wrote frame");

        let done = index + 1;
        if done % PROGRESS_INTERVAL == 0 {
            let fps = done as f64 / start.elapsed().as_secs_f64();
            info!(
                "Progress: {done}/{total} ({:.1}%) | FPS: {fps:.2}",
                done as f64 * 100.0 / total as f64
            );
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    info!(
        "Processed {total} frames in {elapsed:.2}s, {:.2} ms/frame",
        elapsed * 1000.0 / total as f64
    );
    Ok(())
}

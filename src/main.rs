//! gradex - CLI tool to inspect, sample and preview GradientEx gradients.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gradex_core::clipboard;
use gradex_core::io::parse_gradient;
use gradex_core::{
    clamp01, load_gradient, rasterize, sample_evenly, save_gradient, validate_gradient, Gradient,
    PreviewConfig, Rgba,
};

/// Inspect, sample and preview GradientEx color/alpha gradients.
#[derive(Parser, Debug)]
#[command(name = "gradex")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the gradient at evenly spaced or explicit times
    Sample {
        /// Input gradient file (JSON or clipboard text)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of evenly spaced samples from 0 to 1
        #[arg(short, long, default_value = "5")]
        steps: usize,

        /// Explicit normalized times; overrides --steps
        #[arg(long = "at")]
        at: Vec<f32>,

        /// Output samples as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rasterize a preview strip to PNG
    Preview {
        /// Input gradient file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path (defaults to the input with a .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strip width in pixels
        #[arg(long, default_value = "256")]
        width: u32,

        /// Strip height in pixels
        #[arg(long, default_value = "2")]
        height: u32,
    },

    /// Validate a gradient file
    Validate {
        /// Input gradient file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print key counts, mode and HDR information
    Info {
        /// Input gradient file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the clipboard text for a gradient file
    Copy {
        /// Input gradient file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Read clipboard text from stdin and write it as a gradient file
    Paste {
        /// Output gradient file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// One evaluated sample for --json output.
#[derive(Debug, Serialize)]
struct Sample {
    t: f32,
    color: Rgba,
    rgba8: [u8; 4],
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Sample {
            input,
            steps,
            at,
            json,
        } => {
            let gradient = load(&input)?;
            let samples = collect_samples(&gradient, steps, &at);
            if json {
                println!("{}", serde_json::to_string_pretty(&samples)?);
            } else {
                for sample in &samples {
                    println!("{:.4}\t{}\t#{}", sample.t, sample.color, hex(sample.rgba8));
                }
            }
        }
        Command::Preview {
            input,
            output,
            width,
            height,
        } => {
            if width == 0 || height == 0 {
                anyhow::bail!("Preview size must be non-zero, got {}x{}", width, height);
            }
            let gradient = load(&input)?;
            let output_path = output.unwrap_or_else(|| input.with_extension("png"));
            write_preview(&gradient, PreviewConfig::new(width, height), &output_path)?;
            info!("Generated: {}", output_path.display());
        }
        Command::Validate { input } => {
            let gradient = load(&input)?;
            let validation = validate_gradient(&gradient);

            for warning in &validation.warnings {
                warn!("{}", warning);
            }

            for err in &validation.errors {
                error!("{}", err);
            }

            if !validation.passed {
                anyhow::bail!("Validation failed");
            }

            info!("Validation passed");
        }
        Command::Info { input } => {
            let gradient = load(&input)?;
            print!("{}", describe(&gradient));
        }
        Command::Copy { input } => {
            let gradient = load(&input)?;
            println!("{}", clipboard::encode(&gradient)?);
        }
        Command::Paste { output } => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            let gradient = parse_gradient(&text).context("Stdin does not hold a gradient")?;
            save_gradient(&output, &gradient)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Generated: {}", output.display());
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Gradient> {
    info!("Processing: {}", path.display());
    load_gradient(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Evaluate at explicit times when given, otherwise at `steps` even steps.
fn collect_samples(gradient: &Gradient, steps: usize, at: &[f32]) -> Vec<Sample> {
    let points: Vec<(f32, Rgba)> = if at.is_empty() {
        sample_evenly(gradient, steps)
    } else {
        at.iter()
            .map(|&t| {
                if !(0.0..=1.0).contains(&t) {
                    warn!("Time {} is outside [0, 1], clamping", t);
                }
                (t, gradient.evaluate(clamp01(t)))
            })
            .collect()
    };

    points
        .into_iter()
        .map(|(t, color)| Sample {
            t,
            color,
            rgba8: color.to_rgba8(),
        })
        .collect()
}

fn hex(rgba8: [u8; 4]) -> String {
    rgba8.iter().map(|c| format!("{:02x}", c)).collect()
}

fn describe(gradient: &Gradient) -> String {
    format!(
        "mode: {}\ncolor keys: {}\nalpha keys: {}\nmax color component: {}\nhdr: {}\n",
        gradient.mode(),
        gradient.color_key_count(),
        gradient.alpha_key_count(),
        gradient.max_color_component(),
        gradient.is_hdr()
    )
}

fn write_preview(gradient: &Gradient, config: PreviewConfig, path: &Path) -> Result<()> {
    let strip = rasterize(gradient, config);
    let image = image::RgbaImage::from_raw(strip.width, strip.height, strip.to_bytes())
        .context("Preview buffer does not match its size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

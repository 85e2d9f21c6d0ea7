//! Command line arguments
//!
//! Flags override values from the optional configuration file, which in
//! turn overrides the built-in defaults.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use laserburn_core::{GrayscaleAlgorithm, HomingMode, Rgb};
use laserburn_settings::Config;
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Convert a raster image into laser engraving G-code.
///
/// Writes `<filename>` and `<stem>_preview.png` into the output directory.
#[derive(Debug, Parser)]
#[command(
    name = "laserburn",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about
)]
pub struct Args {
    /// Input image (PNG, JPEG, BMP, ...).
    pub input: PathBuf,

    /// Configuration file (.json or .toml).
    #[arg(short = 'C', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to FILE (.json or .toml).
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Output directory; must already exist.
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Program file name.
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// Keep existing files and number the new ones instead (`gcode_01.txt`, ...).
    #[arg(long)]
    pub no_overwrite: bool,

    /// Skip writing the preview image.
    #[arg(long)]
    pub no_preview: bool,

    /// Print the program to stdout instead of writing files.
    #[arg(long, conflicts_with_all = ["directory", "filename", "no_overwrite"])]
    pub stdout: bool,

    /// Resolution in pixels per millimeter.
    #[arg(short = 'r', long)]
    pub resolution: Option<f64>,

    /// Maximum laser power in percent.
    #[arg(short = 'p', long)]
    pub max_power: Option<u32>,

    /// Engraving feed rate in mm/min.
    #[arg(short = 's', long)]
    pub speed: Option<u32>,

    /// Travel feed rate in mm/min (defaults to the engraving feed).
    #[arg(long)]
    pub travel_speed: Option<u32>,

    /// Grayscale algorithm: 1-7 or luminance, average, red, green, blue, max, min.
    #[arg(short = 't', long, value_name = "ALGORITHM")]
    pub grayscale: Option<GrayscaleAlgorithm>,

    /// Homing command: machine ($H), soft (G28) or none.
    #[arg(long, value_name = "MODE")]
    pub homing: Option<HomingMode>,

    /// Overscan distance in millimeters (0 disables).
    #[arg(long, value_name = "MM")]
    pub overscan: Option<f64>,

    /// Engrave a second, vertical pass.
    #[arg(short = 'c', long, overrides_with = "no_cross")]
    pub cross: bool,

    /// Engrave the horizontal pass only, even if the config file enables cross-hatch.
    #[arg(long, overrides_with = "cross")]
    pub no_cross: bool,

    /// Pause (M00) before the vertical pass.
    #[arg(long, overrides_with = "no_pause")]
    pub pause: bool,

    /// Do not pause before the vertical pass.
    #[arg(long, overrides_with = "pause")]
    pub no_pause: bool,

    /// Color transparent pixels are composited over, as #rrggbb.
    #[arg(short = 'b', long, value_name = "COLOR")]
    pub background: Option<Rgb>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Args {
    /// Build the effective configuration: file values, then flag overrides.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        let engraving = &mut config.engraving;
        if let Some(resolution) = self.resolution {
            engraving.resolution = resolution;
        }
        if let Some(max_power) = self.max_power {
            engraving.max_power = max_power;
        }
        if let Some(speed) = self.speed {
            engraving.engrave_feed = format!("F{}", speed);
        }
        if let Some(speed) = self.travel_speed {
            engraving.travel_feed = Some(format!("F{}", speed));
        }
        if let Some(grayscale) = self.grayscale {
            engraving.grayscale = grayscale;
        }
        if let Some(homing) = self.homing {
            engraving.homing = homing;
        }
        if let Some(overscan) = self.overscan {
            engraving.overscan = overscan;
        }
        if let Some(background) = self.background {
            engraving.background = background;
        }
        if let Some(cross_hatch) = flag(self.cross, self.no_cross) {
            engraving.cross_hatch = cross_hatch;
        }
        if let Some(pause) = flag(self.pause, self.no_pause) {
            engraving.pause_between_passes = pause;
        }

        let output = &mut config.output;
        if let Some(directory) = &self.directory {
            output.directory = directory.clone();
        }
        if let Some(filename) = &self.filename {
            output.filename = filename.clone();
        }
        if self.no_overwrite {
            output.overwrite = false;
        }
        if self.no_preview {
            output.preview = false;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Resolve a `--x`/`--no-x` pair; `None` keeps the configured value
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

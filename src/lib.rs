//! # laserburn
//!
//! Converts raster images into laser engraving G-code.
//!
//! ## Architecture
//!
//! laserburn is organized as a workspace with multiple crates:
//!
//! 1. **laserburn-core** - Raster input, engraving parameters, errors
//! 2. **laserburn-camtools** - Grayscale mapping, serpentine scanning, power encoding, program assembly
//! 3. **laserburn-settings** - JSON/TOML configuration files
//! 4. **laserburn** - Command line front end, output files, logging
//!
//! ## Features
//!
//! - **Power Modulation**: pixel darkness scales laser power up to a configurable maximum
//! - **Run Collapsing**: runs of equal intensity become a single move
//! - **Overscan**: zero-power lead-in and lead-out beyond the artwork edges
//! - **Cross-Hatch**: optional vertical pass, with an optional pause between passes
//! - **Preview**: grayscale image of exactly what will be engraved

pub mod cli;
pub mod engrave;
pub mod output;

pub use cli::{Args, LogFormat};
pub use engrave::{run, RunSummary};
pub use output::{split_filename, OutputPaths};

pub use laserburn_camtools::{EngravingJob, RasterEngraver};
pub use laserburn_core::{
    ConfigurationError, EngravingParameters, Error, GrayscaleAlgorithm, HomingMode, InputError,
    Raster, Result, Rgb,
};
pub use laserburn_settings::{Config, OutputSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging in the given format
///
/// Sets up structured logging with:
/// - Output on stderr, so the program can be streamed to stdout
/// - RUST_LOG environment variable support (default level INFO)
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

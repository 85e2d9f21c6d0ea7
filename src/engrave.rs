//! One engraving run: load the image, generate the program, write artifacts.

use crate::cli::Args;
use crate::output::OutputPaths;
use anyhow::{Context, Result};
use laserburn_camtools::RasterEngraver;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, trace};

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Program file, `None` when streamed to stdout
    pub gcode: Option<PathBuf>,
    /// Preview file, if one was written
    pub preview: Option<PathBuf>,
    /// Motion commands across all passes
    pub command_count: usize,
}

/// Execute the run described by `args`
pub fn run(args: &Args) -> Result<RunSummary> {
    let config = args.to_config()?;

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save config {}", path.display()))?;
        info!("Saved configuration to {}", path.display());
    }

    // fail on a bad output directory before doing any work
    let paths = if args.stdout {
        None
    } else {
        Some(OutputPaths::resolve(&config.output)?)
    };

    let engraver = RasterEngraver::from_file(&args.input, config.engraving.clone())
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let (width_mm, height_mm) = engraver.output_size_mm();
    info!(
        "Engraving area {:.2}mm x {:.2}mm at {} pixels/mm",
        width_mm, height_mm, config.engraving.resolution
    );

    let job = engraver.generate_with_progress(|progress| {
        trace!("Progress {:.0}%", progress * 100.0);
    });
    let gcode = job.compile();

    let Some(paths) = paths else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(gcode.as_bytes())
            .context("Failed to write program to stdout")?;
        stdout.flush()?;
        return Ok(RunSummary {
            gcode: None,
            preview: None,
            command_count: job.command_count(),
        });
    };

    paths.write_gcode(&gcode)?;
    let preview = if config.output.preview {
        paths.write_preview(engraver.intensities())?;
        Some(paths.preview)
    } else {
        None
    };

    Ok(RunSummary {
        gcode: Some(paths.gcode),
        preview,
        command_count: job.command_count(),
    })
}

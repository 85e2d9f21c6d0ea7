//! Raster Image Engraving Tool
//!
//! Converts a bitmap to a laser engraving program using serpentine raster
//! scanning. Pixel darkness modulates laser power, runs of equal intensity
//! collapse into single moves, and optional overscan lets the head reach
//! speed before crossing the artwork edge. Cross-hatch mode adds a second,
//! vertical pass over the same image.
//!
//! Images are scanned with the bottom raster row at machine Y = 0 to match
//! device coordinate space where Y increases upward.

use crate::grayscale::intensity_grid;
use crate::power_encoder::{MotionCommand, PowerEncoder};
use crate::program::{Program, PAUSE_COMMAND};
use crate::scan_path::{ScanAxis, ScanPath};
use image::{DynamicImage, GrayImage};
use laserburn_core::{EngravingParameters, Raster, Result};
use std::path::Path;
use tracing::{debug, info};

/// Programs produced for one engraving job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngravingJob {
    horizontal: Program,
    vertical: Option<Program>,
    pause_between_passes: bool,
}

impl EngravingJob {
    /// Horizontal pass (always present)
    pub fn horizontal(&self) -> &Program {
        &self.horizontal
    }

    /// Vertical pass, present in cross-hatch mode
    pub fn vertical(&self) -> Option<&Program> {
        self.vertical.as_ref()
    }

    /// Motion commands across all passes
    pub fn command_count(&self) -> usize {
        self.horizontal.command_count()
            + self.vertical.as_ref().map_or(0, Program::command_count)
    }

    /// Full program text: horizontal pass, optional pause, vertical pass
    pub fn compile(&self) -> String {
        let mut gcode = self.horizontal.compile();
        if let Some(vertical) = &self.vertical {
            if self.pause_between_passes {
                gcode.push_str(PAUSE_COMMAND);
            }
            gcode.push_str(&vertical.compile());
        }
        gcode
    }
}

/// Laser engraving tool for raster images
#[derive(Debug, Clone)]
pub struct RasterEngraver {
    raster: Raster,
    intensities: GrayImage,
    params: EngravingParameters,
}

impl RasterEngraver {
    /// Create an engraver for a validated raster.
    ///
    /// Parameters are checked here so generation itself cannot fail.
    pub fn new(raster: Raster, params: EngravingParameters) -> Result<Self> {
        params.validate()?;
        let intensities = intensity_grid(&raster, params.grayscale);
        Ok(Self {
            raster,
            intensities,
            params,
        })
    }

    /// Create an engraver from a decoded image, compositing transparency
    /// over the configured background color
    pub fn from_image(img: &DynamicImage, params: EngravingParameters) -> Result<Self> {
        params.validate()?;
        let raster = Raster::from_image(img, params.background)?;
        Self::new(raster, params)
    }

    /// Create an engraver from an image file
    pub fn from_file<P: AsRef<Path>>(path: P, params: EngravingParameters) -> Result<Self> {
        let img = image::open(path.as_ref())?;
        debug!(
            "Loaded {} ({}x{})",
            path.as_ref().display(),
            img.width(),
            img.height()
        );
        Self::from_image(&img, params)
    }

    /// Per-pixel intensities used for engraving, in raster orientation.
    /// Written out as the preview image.
    pub fn intensities(&self) -> &GrayImage {
        &self.intensities
    }

    /// Engraved area in millimeters
    pub fn output_size_mm(&self) -> (f64, f64) {
        (
            self.params.to_mm(self.raster.width()),
            self.params.to_mm(self.raster.height()),
        )
    }

    /// Encode a single pass over the whole raster
    pub fn encode_pass(&self, axis: ScanAxis) -> Vec<MotionCommand> {
        self.encode_pass_with_progress(axis, &mut |_| {})
    }

    fn encode_pass_with_progress<F>(&self, axis: ScanAxis, on_line: &mut F) -> Vec<MotionCommand>
    where
        F: FnMut(u32),
    {
        let (width, height) = (self.raster.width(), self.raster.height());
        let line_length = axis.line_length(width, height) as usize;
        let samples = self.intensities.as_raw();

        let mut encoder = PowerEncoder::new(&self.params);
        for (index, step) in ScanPath::new(width, height, axis).enumerate() {
            encoder.push_pixel(&step, samples[step.offset]);
            if (index + 1) % line_length == 0 {
                on_line(step.line);
            }
        }

        let commands = encoder.into_commands();
        debug!("{} pass: {} commands", axis, commands.len());
        commands
    }

    /// Generate the engraving job
    pub fn generate(&self) -> EngravingJob {
        self.generate_with_progress(|_| {})
    }

    /// Generate the engraving job, reporting progress in `0.0..=1.0` after
    /// every scan line
    pub fn generate_with_progress<F>(&self, mut progress_callback: F) -> EngravingJob
    where
        F: FnMut(f32),
    {
        let (width, height) = (self.raster.width(), self.raster.height());
        let cross_hatch = self.params.cross_hatch;
        info!(
            "Engraving {}x{} px raster{}",
            width,
            height,
            if cross_hatch { " with cross-hatch" } else { "" }
        );

        let total_lines = ScanAxis::Horizontal.line_count(width, height) as f32
            + if cross_hatch {
                ScanAxis::Vertical.line_count(width, height) as f32
            } else {
                0.0
            };
        progress_callback(0.0);

        let mut lines_done = 0.0f32;
        let mut on_line = |_line: u32| {
            lines_done += 1.0;
            progress_callback(lines_done / total_lines);
        };

        let mut horizontal = Program::with_homing(self.params.homing);
        horizontal.create_default_header(
            &self.params.engrave_feed,
            self.params.travel_feed(),
            &self.header_comments(),
        );
        horizontal
            .extend_commands(&self.encode_pass_with_progress(ScanAxis::Horizontal, &mut on_line));

        let vertical = if cross_hatch {
            let mut vertical = Program::with_homing(self.params.homing);
            vertical
                .extend_commands(&self.encode_pass_with_progress(ScanAxis::Vertical, &mut on_line));
            vertical.create_default_footer();
            Some(vertical)
        } else {
            horizontal.create_default_footer();
            None
        };

        let job = EngravingJob {
            horizontal,
            vertical,
            pause_between_passes: self.params.pause_between_passes,
        };
        info!("Generated {} motion commands", job.command_count());
        job
    }

    /// Generate the complete G-code text
    pub fn generate_gcode(&self) -> String {
        self.generate().compile()
    }

    fn header_comments(&self) -> Vec<String> {
        let (width_mm, height_mm) = self.output_size_mm();
        let p = &self.params;

        let mut comments = vec![
            format!(
                "Image size: {}x{} px, {:.2}mm x {:.2}mm",
                self.raster.width(),
                self.raster.height(),
                width_mm,
                height_mm
            ),
            format!("Resolution: {} pixels/mm", p.resolution),
            format!("Max power: {}%", p.max_power),
            format!("Grayscale: {}", p.grayscale),
        ];
        if p.overscan_enabled() {
            comments.push(format!("Overscan: {} mm", p.overscan));
        }
        comments.push(if p.cross_hatch {
            "Passes: horizontal, vertical".to_string()
        } else {
            "Passes: horizontal".to_string()
        });
        comments
    }
}

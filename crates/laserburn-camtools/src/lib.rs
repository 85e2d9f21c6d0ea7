//! # laserburn CAM Tools
//!
//! Raster processing that turns an image into a laser engraving program.
//!
//! ## Pipeline
//!
//! - **Grayscale**: per-pixel intensity from RGB using a selectable algorithm
//! - **Scan Path**: serpentine pixel ordering for horizontal and vertical passes
//! - **Power Encoder**: run-length power modulation with optional overscan
//! - **Program**: header, body, and footer assembly
//! - **Raster Engraver**: drives the whole job, including cross-hatch passes

pub mod grayscale;
pub mod power_encoder;
pub mod program;
pub mod raster_engraver;
pub mod scan_path;

pub use grayscale::{intensity_grid, to_intensity};
pub use power_encoder::{
    EncoderState, MotionCommand, MotionMode, OverscanState, PowerEncoder, BACKGROUND,
};
pub use program::{Program, PAUSE_COMMAND};
pub use raster_engraver::{EngravingJob, RasterEngraver};
pub use scan_path::{scan_step, LineEdge, ScanAxis, ScanDirection, ScanPath, ScanStep};

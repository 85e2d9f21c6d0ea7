//! # laserburn Core
//!
//! Core types shared by the laserburn crates:
//! - the validated input [`Raster`]
//! - the immutable [`EngravingParameters`] record
//! - the error taxonomy ([`ConfigurationError`], [`InputError`], [`Error`])

pub mod error;
pub mod params;
pub mod raster;
pub mod units;

pub use error::{ConfigurationError, Error, InputError, Result};
pub use params::{EngravingParameters, GrayscaleAlgorithm, HomingMode, Rgb};
pub use raster::Raster;
pub use units::format_mm;

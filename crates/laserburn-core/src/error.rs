//! Error handling for laserburn
//!
//! Every failure the engraving core can report is detected while validating
//! the inputs, before a single command is emitted:
//! - Configuration errors (invalid engraving parameters)
//! - Input errors (malformed raster)
//!
//! I/O failures only occur at the boundary where artifacts are written and
//! are carried through [`Error::Io`].
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised when the engraving parameters cannot produce a valid program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Resolution must be a finite, positive number of pixels per millimeter
    #[error("Resolution must be > 0 pixels/mm, got {value}")]
    InvalidResolution {
        /// The rejected resolution.
        value: f64,
    },

    /// Maximum laser power must be a positive percentage
    #[error("Max power must be > 0%, got {value}")]
    InvalidMaxPower {
        /// The rejected power percentage.
        value: f64,
    },

    /// Overscan distance must be finite and non-negative
    #[error("Overscan distance must be >= 0 mm, got {value}")]
    InvalidOverscan {
        /// The rejected overscan distance.
        value: f64,
    },

    /// The grayscale algorithm selector is not one of 1..7
    #[error("Unknown grayscale algorithm: {selector}")]
    UnknownGrayscaleAlgorithm {
        /// The selector as it was given.
        selector: String,
    },

    /// The homing mode is not recognised
    #[error("Unknown homing mode: {mode}")]
    UnknownHomingMode {
        /// The mode as it was given.
        mode: String,
    },

    /// A feed rate word is empty
    #[error("Feed rate '{name}' must not be empty")]
    EmptyFeed {
        /// Which feed was empty.
        name: String,
    },

    /// A color could not be parsed
    #[error("Invalid color '{value}': expected #rrggbb")]
    InvalidColor {
        /// The rejected color string.
        value: String,
    },
}

/// Input error type
///
/// Raised when the raster handed to the engraver is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Width or height is zero
    #[error("Raster dimensions must be non-zero, got {width}x{height}")]
    EmptyRaster {
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },

    /// Only RGB and RGBA buffers are accepted
    #[error("Unsupported channel count {channels} (expected 3 or 4)")]
    UnsupportedChannels {
        /// The rejected channel count.
        channels: usize,
    },

    /// The pixel buffer does not match `width * height * channels`
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferLength {
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },
}

/// Main error type for laserburn
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Input error
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// I/O error at the artifact boundary
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Check whether the error was caused by invalid parameters
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check whether the error was caused by a malformed raster
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Result type for laserburn operations
pub type Result<T> = std::result::Result<T, Error>;

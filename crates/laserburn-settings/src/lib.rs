//! laserburn Settings Crate
//!
//! Loads, validates, and saves engraving configuration files.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, OutputSettings, DEFAULT_FILENAME};
pub use error::{Result, SettingsError};

//! Configuration files for laserburn
//!
//! A configuration file holds two sections:
//! - `engraving`: the raster engraving parameters
//! - `output`: where the program and preview are written
//!
//! JSON and TOML are supported, chosen by file extension. Every section and
//! field is optional; missing values take their defaults.

use crate::error::{Result, SettingsError};
use laserburn_core::EngravingParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default program file name
pub const DEFAULT_FILENAME: &str = "gcode.txt";

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the artifacts are written to; must already exist
    pub directory: PathBuf,
    /// Program file name, e.g. `gcode.txt`
    pub filename: String,
    /// Replace an existing program instead of numbering a new one
    pub overwrite: bool,
    /// Also write the grayscale preview image
    pub preview: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            filename: DEFAULT_FILENAME.to_string(),
            overwrite: true,
            preview: true,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engraving: EngravingParameters,
    pub output: OutputSettings,
}

impl Config {
    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.engraving.validate()?;

        let filename = self.output.filename.trim();
        if filename.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.filename".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        // a bare file name; the directory is configured separately
        if Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename) {
            return Err(SettingsError::InvalidSetting {
                key: "output.filename".to_string(),
                reason: format!("'{}' must not contain a directory", filename),
            });
        }

        Ok(())
    }
}

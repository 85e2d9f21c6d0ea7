//! Engraving parameters
//!
//! The immutable configuration record consumed by every stage of the
//! engraver. It is validated once, before any pixel is visited.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A grayscale or homing selector as written in a settings file: either
/// its number or its name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Number(i64),
    Name(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Grayscale conversion formula
///
/// Numbered 1..7 on the command line and in legacy settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "Selector")]
pub enum GrayscaleAlgorithm {
    /// 0.21 R + 0.71 G + 0.07 B
    #[default]
    Luminance,
    /// (R + G + B) / 3
    Average,
    /// Red channel only
    Red,
    /// Green channel only
    Green,
    /// Blue channel only
    Blue,
    /// Lightest channel
    Max,
    /// Darkest channel
    Min,
}

impl GrayscaleAlgorithm {
    /// All algorithms in selector order
    pub const ALL: [Self; 7] = [
        Self::Luminance,
        Self::Average,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Max,
        Self::Min,
    ];

    /// Numeric selector (1..7)
    pub fn selector(self) -> u8 {
        match self {
            Self::Luminance => 1,
            Self::Average => 2,
            Self::Red => 3,
            Self::Green => 4,
            Self::Blue => 5,
            Self::Max => 6,
            Self::Min => 7,
        }
    }
}

impl TryFrom<u8> for GrayscaleAlgorithm {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.selector() == value)
            .ok_or_else(|| ConfigurationError::UnknownGrayscaleAlgorithm {
                selector: value.to_string(),
            })
    }
}

impl TryFrom<Selector> for GrayscaleAlgorithm {
    type Error = ConfigurationError;

    fn try_from(value: Selector) -> Result<Self, Self::Error> {
        value.to_string().parse()
    }
}

impl FromStr for GrayscaleAlgorithm {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigurationError::UnknownGrayscaleAlgorithm {
            selector: s.to_string(),
        };

        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::try_from(n).map_err(|_| unknown());
        }

        match s.to_lowercase().as_str() {
            "luminance" => Ok(Self::Luminance),
            "average" => Ok(Self::Average),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for GrayscaleAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Luminance => write!(f, "luminance"),
            Self::Average => write!(f, "average"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Max => write!(f, "max"),
            Self::Min => write!(f, "min"),
        }
    }
}

/// Homing command emitted in the header and footer
///
/// Numbered 0 (none), 1 (machine) and 2 (soft) in legacy settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "Selector")]
pub enum HomingMode {
    /// No homing
    None,
    /// Return to the stored home position (`G28`)
    Soft,
    /// Run the controller's homing cycle (`$H`)
    #[default]
    Machine,
}

impl HomingMode {
    /// The G-code line for this mode, without comment
    pub fn command(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Soft => Some("G28"),
            Self::Machine => Some("$H"),
        }
    }
}

impl TryFrom<Selector> for HomingMode {
    type Error = ConfigurationError;

    fn try_from(value: Selector) -> Result<Self, Self::Error> {
        value.to_string().parse()
    }
}

impl FromStr for HomingMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(Self::None),
            "machine" | "$h" | "1" => Ok(Self::Machine),
            "soft" | "g28" | "2" => Ok(Self::Soft),
            _ => Err(ConfigurationError::UnknownHomingMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HomingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Soft => write!(f, "soft"),
            Self::Machine => write!(f, "machine"),
        }
    }
}

/// 8-bit RGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgb {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidColor {
            value: s.to_string(),
        };

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Raster engraving parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingParameters {
    /// Resolution in pixels per millimeter
    pub resolution: f64,
    /// Maximum laser power in percent
    pub max_power: u32,
    /// Feed word for engraving moves, emitted verbatim (e.g. `F800`)
    pub engrave_feed: String,
    /// Feed word for travel moves; falls back to `engrave_feed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_feed: Option<String>,
    /// Homing command placed in the header and footer
    pub homing: HomingMode,
    /// Overscan distance in millimeters (0 disables overscan)
    pub overscan: f64,
    /// Engrave a second, vertical pass
    pub cross_hatch: bool,
    /// Insert `M00` between the horizontal and vertical passes
    pub pause_between_passes: bool,
    /// Grayscale conversion formula
    pub grayscale: GrayscaleAlgorithm,
    /// Color transparent pixels are composited over
    pub background: Rgb,
}

impl Default for EngravingParameters {
    fn default() -> Self {
        Self {
            resolution: 10.0,
            max_power: 100,
            engrave_feed: "F800".to_string(),
            travel_feed: None,
            homing: HomingMode::default(),
            overscan: 0.0,
            cross_hatch: false,
            pause_between_passes: false,
            grayscale: GrayscaleAlgorithm::default(),
            background: Rgb::WHITE,
        }
    }
}

impl EngravingParameters {
    /// Reject parameters that cannot produce a valid program
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(ConfigurationError::InvalidResolution {
                value: self.resolution,
            });
        }

        if self.max_power == 0 {
            return Err(ConfigurationError::InvalidMaxPower {
                value: self.max_power as f64,
            });
        }

        if !self.overscan.is_finite() || self.overscan < 0.0 {
            return Err(ConfigurationError::InvalidOverscan {
                value: self.overscan,
            });
        }

        if self.engrave_feed.trim().is_empty() {
            return Err(ConfigurationError::EmptyFeed {
                name: "engrave_feed".to_string(),
            });
        }

        if matches!(&self.travel_feed, Some(feed) if feed.trim().is_empty()) {
            return Err(ConfigurationError::EmptyFeed {
                name: "travel_feed".to_string(),
            });
        }

        Ok(())
    }

    /// Feed word for travel moves
    pub fn travel_feed(&self) -> &str {
        self.travel_feed.as_deref().unwrap_or(&self.engrave_feed)
    }

    /// Whether overscan extensions are emitted
    pub fn overscan_enabled(&self) -> bool {
        self.overscan != 0.0
    }

    /// Convert a pixel coordinate to millimeters
    pub fn to_mm(&self, pixels: u32) -> f64 {
        pixels as f64 / self.resolution
    }
}

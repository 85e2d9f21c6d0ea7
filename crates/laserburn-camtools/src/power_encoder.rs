//! Laser power encoding
//!
//! Turns a directionally ordered stream of pixel intensities into motion
//! commands. A command is only emitted where the intensity changes, so a run
//! of identical pixels collapses into a single move. Border pixels that are
//! not background always produce a command so edge pixels are engraved
//! explicitly.
//!
//! With overscan enabled, every dark run is preceded by a zero-power travel
//! move that starts `overscan` mm before the run, and the excursion is
//! closed at the end of the scan line by a travel move `overscan` mm past the
//! last engraved position. The head therefore crosses the artwork edges at
//! full speed.

use crate::scan_path::{ScanAxis, ScanStep};
use laserburn_core::{format_mm, EngravingParameters};
use std::fmt;

/// Intensity of an unengraved pixel
pub const BACKGROUND: u8 = 255;

/// Motion mode of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// `G00`
    Travel,
    /// `G01`
    Engrave,
}

impl MotionMode {
    pub fn code(self) -> &'static str {
        match self {
            Self::Travel => "G00",
            Self::Engrave => "G01",
        }
    }
}

/// A single motion/power line of the program body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub mode: MotionMode,
    /// Target X in mm
    pub x: f64,
    /// Target Y in mm
    pub y: f64,
    /// Spindle word (`S`) value
    pub power: u32,
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} X{} Y{} S{}",
            self.mode.code(),
            format_mm(self.x),
            format_mm(self.y),
            self.power
        )
    }
}

/// Overscan progress of the current scan line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverscanState {
    /// Not inside an overscan excursion
    Idle,
    /// A pre-extension was emitted and the line has not been closed yet.
    /// `anchor` holds the axis position where engraving last stopped.
    Overscanning { anchor: Option<f64> },
}

/// Mutable per-pass state of the encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderState {
    /// Intensity of the last emitted command
    pub current_power: u8,
    pub overscan: OverscanState,
}

impl Default for EncoderState {
    fn default() -> Self {
        Self {
            current_power: BACKGROUND,
            overscan: OverscanState::Idle,
        }
    }
}

/// Power encoder for one scan pass
#[derive(Debug, Clone)]
pub struct PowerEncoder {
    resolution: f64,
    max_power: f64,
    overscan: f64,
    state: EncoderState,
    commands: Vec<MotionCommand>,
}

impl PowerEncoder {
    /// Create an encoder from validated parameters
    pub fn new(params: &EngravingParameters) -> Self {
        Self {
            resolution: params.resolution,
            max_power: params.max_power as f64,
            overscan: params.overscan,
            state: EncoderState::default(),
            commands: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &EncoderState {
        &self.state
    }

    /// Commands emitted so far
    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    /// Consume the encoder, returning its commands in emission order
    pub fn into_commands(self) -> Vec<MotionCommand> {
        self.commands
    }

    /// `S` value for an intensity: darker pixels burn harder, scaled to the
    /// configured maximum power.
    pub fn power_for(&self, intensity: u8) -> u32 {
        ((BACKGROUND - intensity) as f64 / self.max_power * 100.0).round() as u32
    }

    /// Feed one pixel of the pass
    pub fn push_pixel(&mut self, step: &ScanStep, intensity: u8) {
        let x = step.grid_x as f64 / self.resolution;
        let y = step.grid_y as f64 / self.resolution;
        let along = match step.axis {
            ScanAxis::Horizontal => x,
            ScanAxis::Vertical => y,
        };
        let extension = self.overscan * step.travel_sign();
        let overscan_enabled = self.overscan != 0.0;

        let changed = intensity != self.state.current_power;
        let forced = step.is_border() && intensity != BACKGROUND;

        if changed || forced {
            if overscan_enabled {
                match self.state.overscan {
                    OverscanState::Idle if intensity != BACKGROUND => {
                        self.state.overscan = OverscanState::Overscanning { anchor: None };
                        self.travel_along(step.axis, along - extension, x, y);
                    }
                    OverscanState::Idle => {}
                    OverscanState::Overscanning { .. } => {
                        // a stop point only matters until engraving resumes
                        let anchor = (intensity == BACKGROUND).then_some(along);
                        self.state.overscan = OverscanState::Overscanning { anchor };
                    }
                }
            }

            let mode = if self.state.current_power == BACKGROUND {
                MotionMode::Travel
            } else {
                MotionMode::Engrave
            };
            self.commands.push(MotionCommand {
                mode,
                x,
                y,
                power: self.power_for(intensity),
            });
            self.state.current_power = intensity;
        }

        if overscan_enabled && step.ends_line() {
            if let OverscanState::Overscanning { anchor } = self.state.overscan {
                let end = anchor.unwrap_or(along);
                self.state.overscan = OverscanState::Idle;
                self.travel_along(step.axis, end + extension, x, y);
                self.state.current_power = BACKGROUND;
            }
        }
    }

    /// Zero-power travel to `position` on the scan axis, keeping the other
    /// coordinate.
    fn travel_along(&mut self, axis: ScanAxis, position: f64, x: f64, y: f64) {
        let (x, y) = match axis {
            ScanAxis::Horizontal => (position, y),
            ScanAxis::Vertical => (x, position),
        };
        self.commands.push(MotionCommand {
            mode: MotionMode::Travel,
            x,
            y,
            power: self.power_for(BACKGROUND),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_path::ScanPath;

    fn params(overscan: f64) -> EngravingParameters {
        EngravingParameters {
            resolution: 1.0,
            max_power: 100,
            overscan,
            ..Default::default()
        }
    }

    fn encode_row(values: &[u8], overscan: f64) -> Vec<MotionCommand> {
        let mut encoder = PowerEncoder::new(&params(overscan));
        for step in ScanPath::new(values.len() as u32, 1, ScanAxis::Horizontal) {
            encoder.push_pixel(&step, values[step.offset]);
        }
        encoder.into_commands()
    }

    #[test]
    fn test_power_mapping() {
        let encoder = PowerEncoder::new(&params(0.0));
        assert_eq!(encoder.power_for(255), 0);
        assert_eq!(encoder.power_for(0), 255);
        assert_eq!(encoder.power_for(128), 127);

        let half = PowerEncoder::new(&EngravingParameters {
            max_power: 50,
            ..Default::default()
        });
        assert_eq!(half.power_for(0), 510);
        assert_eq!(half.power_for(254), 2);

        let odd = PowerEncoder::new(&EngravingParameters {
            max_power: 30,
            ..Default::default()
        });
        // 1/30*100 = 3.33
        assert_eq!(odd.power_for(254), 3);
        // 2/30*100 = 6.67
        assert_eq!(odd.power_for(253), 7);
    }

    #[test]
    fn test_dark_then_background() {
        let commands = encode_row(&[0, 255], 0.0);
        let lines: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec!["G00 X0.000 Y0.000 S255", "G01 X1.000 Y0.000 S0"]
        );
    }

    #[test]
    fn test_blank_line_emits_nothing() {
        assert!(encode_row(&[255, 255, 255, 255], 0.0).is_empty());
        assert!(encode_row(&[255, 255, 255, 255], 3.0).is_empty());
    }

    #[test]
    fn test_run_collapsing() {
        // uniform interior run, background borders
        let commands = encode_row(&[255, 40, 40, 40, 40, 255], 0.0);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].x, 1.0);
        assert_eq!(commands[0].mode, MotionMode::Travel);
        assert_eq!(commands[1].x, 5.0);
        assert_eq!(commands[1].mode, MotionMode::Engrave);
    }

    #[test]
    fn test_border_forcing() {
        // last pixel repeats its predecessor but sits on the border
        let commands = encode_row(&[255, 90, 90], 0.0);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].x, 2.0);
        assert_eq!(commands[1].power, 165);

        // background border pixels are not forced
        let commands = encode_row(&[90, 255, 255], 0.0);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_overscan_forward_run() {
        let commands = encode_row(&[255, 0, 0, 0, 255, 255], 2.0);
        let lines: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "G00 X-1.000 Y0.000 S0",
                "G00 X1.000 Y0.000 S255",
                "G01 X4.000 Y0.000 S0",
                "G00 X6.000 Y0.000 S0",
            ]
        );
    }

    #[test]
    fn test_overscan_run_ending_on_border() {
        let values = [255, 0, 0, 0, 255];
        let mut encoder = PowerEncoder::new(&params(2.0));
        for step in ScanPath::new(5, 1, ScanAxis::Horizontal) {
            encoder.push_pixel(&step, values[step.offset]);
        }
        assert_eq!(encoder.state().overscan, OverscanState::Idle);

        // the post-extension follows the command that ends the run
        let lines: Vec<String> = encoder.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "G00 X-1.000 Y0.000 S0",
                "G00 X1.000 Y0.000 S255",
                "G01 X4.000 Y0.000 S0",
                "G00 X6.000 Y0.000 S0",
            ]
        );
    }

    #[test]
    fn test_overscan_dark_to_the_edge() {
        let mut encoder = PowerEncoder::new(&params(1.5));
        for step in ScanPath::new(3, 1, ScanAxis::Horizontal) {
            encoder.push_pixel(&step, 0);
        }
        assert_eq!(encoder.state().overscan, OverscanState::Idle);
        assert_eq!(encoder.state().current_power, BACKGROUND);

        let lines: Vec<String> = encoder.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "G00 X-1.500 Y0.000 S0",
                "G00 X0.000 Y0.000 S255",
                "G01 X2.000 Y0.000 S255",
                "G00 X3.500 Y0.000 S0",
            ]
        );
    }

    #[test]
    fn test_overscan_gap_inside_line() {
        // the anchor recorded at the gap must not survive the second run
        let commands = encode_row(&[255, 0, 255, 0, 0], 1.0);
        let last = commands.last().unwrap();
        assert_eq!(last.mode, MotionMode::Travel);
        assert_eq!(last.x, 5.0);
        // exactly one pre-extension for the line
        let pre = commands.iter().filter(|c| c.x == 0.0).count();
        assert_eq!(pre, 1);
    }

    #[test]
    fn test_overscan_reverse_row() {
        // 4x2 raster: second row is traversed right-to-left
        let values = [255, 255, 255, 255, 255, 0, 0, 255];
        let mut encoder = PowerEncoder::new(&params(2.0));
        for step in ScanPath::new(4, 2, ScanAxis::Horizontal) {
            encoder.push_pixel(&step, values[step.offset]);
        }
        let lines: Vec<String> = encoder.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "G00 X4.000 Y0.000 S0",
                "G00 X2.000 Y0.000 S255",
                "G01 X0.000 Y0.000 S0",
                "G00 X-2.000 Y0.000 S0",
            ]
        );
    }

    #[test]
    fn test_overscan_single_pixel_lines() {
        // 1x2 raster: each row is one pixel that both starts and ends its line
        let mut encoder = PowerEncoder::new(&params(1.0));
        for step in ScanPath::new(1, 2, ScanAxis::Horizontal) {
            encoder.push_pixel(&step, 0);
        }
        assert_eq!(encoder.state().overscan, OverscanState::Idle);
        assert_eq!(encoder.state().current_power, BACKGROUND);

        let lines: Vec<String> = encoder.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                // row 0, left-to-right
                "G00 X-1.000 Y1.000 S0",
                "G00 X0.000 Y1.000 S255",
                "G00 X1.000 Y1.000 S0",
                // row 1, right-to-left
                "G00 X1.000 Y0.000 S0",
                "G00 X0.000 Y0.000 S255",
                "G00 X-1.000 Y0.000 S0",
            ]
        );
    }

    #[test]
    fn test_overscan_vertical_column() {
        // 1x4 raster, one column scanned top-to-bottom (toward -Y)
        let values = [255, 0, 0, 255];
        let mut encoder = PowerEncoder::new(&params(1.0));
        for step in ScanPath::new(1, 4, ScanAxis::Vertical) {
            encoder.push_pixel(&step, values[step.offset]);
        }
        let lines: Vec<String> = encoder.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "G00 X0.000 Y3.000 S0",
                "G00 X0.000 Y2.000 S255",
                "G01 X0.000 Y0.000 S0",
                "G00 X0.000 Y-1.000 S0",
            ]
        );
    }
}

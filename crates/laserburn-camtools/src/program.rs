//! G-code program assembly
//!
//! A [`Program`] is three text sections: a header that prepares the machine,
//! an append-only body of motion commands, and a footer that parks the head.
//! Compiling is plain concatenation in that order.

use crate::power_encoder::MotionCommand;
use laserburn_core::HomingMode;

/// Program pause between cross-hatch passes
pub const PAUSE_COMMAND: &str = "M00 ; Pause before next pass\n";

/// A G-code program under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    header: String,
    body: String,
    footer: String,
    homing: String,
    command_count: usize,
}

impl Program {
    /// Create an empty program without homing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty program that homes with `mode`
    pub fn with_homing(mode: HomingMode) -> Self {
        let mut program = Self::new();
        program.set_homing(mode);
        program
    }

    /// Select the homing line used by the header and footer.
    ///
    /// Call before building the header or footer.
    pub fn set_homing(&mut self, mode: HomingMode) {
        self.homing = match mode.command() {
            Some(cmd) => format!("{} ; Home all axes\n", cmd),
            None => String::new(),
        };
    }

    /// Build the standard header.
    ///
    /// `comments` are written as `;` lines after the generator banner.
    pub fn create_default_header(
        &mut self,
        engrave_feed: &str,
        travel_feed: &str,
        comments: &[String],
    ) {
        let mut header = String::new();
        header.push_str("; Generated with laserburn raster engraver\n");
        for comment in comments {
            header.push_str(&format!("; {}\n", comment));
        }
        header.push_str(";\n");
        header.push_str(&self.homing);
        header.push_str("G21 ; Set units to millimeters\n");
        header.push_str("G90 ; Absolute positioning\n");
        header.push_str("G92 ; Coordinate offset\n");
        header.push_str(&format!("G00 {} ; Set travel feed\n", travel_feed));
        header.push_str(&format!("G01 {} ; Set engraving feed\n", engrave_feed));
        header.push_str("M03 S0 ; Ready laser\n");

        self.header = header;
    }

    /// Build the standard footer: laser off, return to origin, home.
    pub fn create_default_footer(&mut self) {
        let mut footer = String::new();
        footer.push_str("M05 ; Laser off\n");
        footer.push_str("G00 X0 Y0 ; Return to origin\n");
        footer.push_str(&self.homing);

        self.footer = footer;
    }

    /// Append a motion command to the body
    pub fn push_command(&mut self, command: &MotionCommand) {
        self.body.push_str(&command.to_string());
        self.body.push('\n');
        self.command_count += 1;
    }

    /// Append motion commands to the body in order
    pub fn extend_commands<'a, I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = &'a MotionCommand>,
    {
        for command in commands {
            self.push_command(command);
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// Number of motion commands in the body
    pub fn command_count(&self) -> usize {
        self.command_count
    }

    /// Header, body, and footer, in that order
    pub fn compile(&self) -> String {
        let mut out =
            String::with_capacity(self.header.len() + self.body.len() + self.footer.len());
        out.push_str(&self.header);
        out.push_str(&self.body);
        out.push_str(&self.footer);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_encoder::MotionMode;

    #[test]
    fn test_header_with_machine_homing() {
        let mut program = Program::with_homing(HomingMode::Machine);
        program.create_default_header("F800", "F800", &[]);

        let header = program.header();
        assert!(header.starts_with("; Generated with laserburn raster engraver\n"));
        assert!(header.contains("$H ; Home all axes\nG21 ; Set units to millimeters\n"));
        assert!(header.contains("G00 F800 ; Set travel feed\n"));
        assert!(header.contains("G01 F800 ; Set engraving feed\n"));
        assert!(header.ends_with("M03 S0 ; Ready laser\n"));
    }

    #[test]
    fn test_header_separate_travel_feed() {
        let mut program = Program::with_homing(HomingMode::None);
        program.create_default_header("F600", "F3000", &["Image: 1x1 px".to_string()]);

        assert!(program.header().contains("; Image: 1x1 px\n"));
        assert!(program.header().contains("G00 F3000 ; Set travel feed\n"));
        assert!(program.header().contains("G01 F600 ; Set engraving feed\n"));
        assert!(!program.header().contains("Home all axes"));
    }

    #[test]
    fn test_footer_homing() {
        let mut program = Program::with_homing(HomingMode::Soft);
        program.create_default_footer();
        assert_eq!(
            program.footer(),
            "M05 ; Laser off\nG00 X0 Y0 ; Return to origin\nG28 ; Home all axes\n"
        );

        let mut program = Program::new();
        program.create_default_footer();
        assert_eq!(
            program.footer(),
            "M05 ; Laser off\nG00 X0 Y0 ; Return to origin\n"
        );
    }

    #[test]
    fn test_compile_concatenates_in_order() {
        let mut program = Program::new();
        program.create_default_header("F800", "F800", &[]);
        program.create_default_footer();
        program.push_command(&MotionCommand {
            mode: MotionMode::Engrave,
            x: 1.0,
            y: 0.5,
            power: 42,
        });

        let compiled = program.compile();
        assert_eq!(
            compiled,
            format!("{}G01 X1.000 Y0.500 S42\n{}", program.header(), program.footer())
        );
        assert_eq!(program.command_count(), 1);
    }

    #[test]
    fn test_empty_program_compiles_to_empty() {
        assert_eq!(Program::new().compile(), "");
    }
}

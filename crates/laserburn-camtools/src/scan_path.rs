//! Serpentine scan path indexing
//!
//! Maps a linear pixel index to the grid position visited at that step of a
//! boustrophedon scan. Horizontal passes walk rows, alternating left-to-right
//! and right-to-left; vertical passes walk columns, alternating top-to-bottom
//! and bottom-to-top. Output Y is flipped so that the bottom raster row sits
//! at machine Y = 0.
//!
//! Everything here is pure arithmetic so a whole pass can be inspected
//! without running the encoder.

/// Scanning axis of one engraving pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAxis {
    /// Rows, moving along X
    Horizontal,
    /// Columns, moving along Y
    Vertical,
}

impl ScanAxis {
    /// Number of scan lines in a `width` x `height` raster
    pub fn line_count(self, width: u32, height: u32) -> u32 {
        match self {
            Self::Horizontal => height,
            Self::Vertical => width,
        }
    }

    /// Number of pixels in each scan line
    pub fn line_length(self, width: u32, height: u32) -> u32 {
        match self {
            Self::Horizontal => width,
            Self::Vertical => height,
        }
    }
}

impl std::fmt::Display for ScanAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Direction of a scan line relative to its pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Even lines: left-to-right, or top-to-bottom
    Forward,
    /// Odd lines: right-to-left, or bottom-to-top
    Reverse,
}

impl ScanDirection {
    fn for_line(line: u32) -> Self {
        if line % 2 == 0 {
            Self::Forward
        } else {
            Self::Reverse
        }
    }
}

/// Which end of its scan line a border pixel sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdge {
    /// First pixel visited on the line
    Start,
    /// Last pixel visited on the line
    End,
    /// One-pixel line: first and last at once
    Both,
}

/// One visited pixel of a scan pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStep {
    /// Axis of the pass
    pub axis: ScanAxis,
    /// Scan line index (row for horizontal, column for vertical)
    pub line: u32,
    /// Machine X in pixels
    pub grid_x: u32,
    /// Machine Y in pixels (bottom-left origin)
    pub grid_y: u32,
    /// Row-major pixel index into the raster
    pub offset: usize,
    /// Direction of this pixel's scan line
    pub direction: ScanDirection,
    /// Set for the first and last pixel of a line
    pub edge: Option<LineEdge>,
}

impl ScanStep {
    /// First or last pixel of its scan line
    pub fn is_border(&self) -> bool {
        self.edge.is_some()
    }

    /// Last pixel of its scan line
    pub fn ends_line(&self) -> bool {
        matches!(self.edge, Some(LineEdge::End | LineEdge::Both))
    }

    /// Sign of head travel along the machine axis while on this line.
    ///
    /// Forward horizontal lines move toward +X. Forward vertical lines start
    /// at raster row 0, which the Y flip places at the top of the bed, so they
    /// move toward -Y.
    pub fn travel_sign(&self) -> f64 {
        match (self.axis, self.direction) {
            (ScanAxis::Horizontal, ScanDirection::Forward) => 1.0,
            (ScanAxis::Horizontal, ScanDirection::Reverse) => -1.0,
            (ScanAxis::Vertical, ScanDirection::Forward) => -1.0,
            (ScanAxis::Vertical, ScanDirection::Reverse) => 1.0,
        }
    }
}

/// Locate step `index` (in `0..width*height`) of a serpentine pass.
///
/// Callers guarantee non-zero dimensions and an in-range index.
pub fn scan_step(width: u32, height: u32, index: usize, axis: ScanAxis) -> ScanStep {
    let line_length = axis.line_length(width, height) as usize;
    let line = (index / line_length) as u32;
    let step = (index % line_length) as u32;
    let direction = ScanDirection::for_line(line);

    let along = match direction {
        ScanDirection::Forward => step,
        ScanDirection::Reverse => line_length as u32 - 1 - step,
    };

    let edge = match (step == 0, step as usize == line_length - 1) {
        (true, true) => Some(LineEdge::Both),
        (true, false) => Some(LineEdge::Start),
        (false, true) => Some(LineEdge::End),
        (false, false) => None,
    };

    let (column, row) = match axis {
        ScanAxis::Horizontal => (along, line),
        ScanAxis::Vertical => (line, along),
    };

    ScanStep {
        axis,
        line,
        grid_x: column,
        grid_y: height - 1 - row,
        offset: row as usize * width as usize + column as usize,
        direction,
        edge,
    }
}

/// Iterator over every step of one pass
#[derive(Debug, Clone)]
pub struct ScanPath {
    width: u32,
    height: u32,
    axis: ScanAxis,
    next: usize,
    len: usize,
}

impl ScanPath {
    pub fn new(width: u32, height: u32, axis: ScanAxis) -> Self {
        Self {
            width,
            height,
            axis,
            next: 0,
            len: width as usize * height as usize,
        }
    }
}

impl Iterator for ScanPath {
    type Item = ScanStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let step = scan_step(self.width, self.height, self.next, self.axis);
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScanPath {}

//! Unit formatting utilities
//!
//! Coordinates are carried in millimeters as `f64` and written to G-code
//! with a fixed precision.

/// Decimal places used for coordinates in generated G-code
pub const COORDINATE_PRECISION: usize = 3;

/// Format a millimeter value for a G-code word
///
/// Values that round to zero are written without a sign, so `-0.0004`
/// becomes `0.000` rather than `-0.000`.
pub fn format_mm(value_mm: f64) -> String {
    let formatted = format!("{:.*}", COORDINATE_PRECISION, value_mm);
    match formatted.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm() {
        assert_eq!(format_mm(0.0), "0.000");
        assert_eq!(format_mm(1.0), "1.000");
        assert_eq!(format_mm(0.1), "0.100");
        assert_eq!(format_mm(1.0 / 3.0), "0.333");
        assert_eq!(format_mm(-2.5), "-2.500");
    }

    #[test]
    fn test_format_mm_negative_zero() {
        assert_eq!(format_mm(-0.0), "0.000");
        assert_eq!(format_mm(-0.0004), "0.000");
    }
}

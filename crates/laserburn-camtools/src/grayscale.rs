//! Grayscale conversion
//!
//! Maps an RGB pixel to a single engraving intensity, 255 meaning
//! background (no burn) and 0 the darkest mark. The intensity grid for a
//! whole raster doubles as the preview image written next to the program.

use image::{GrayImage, Luma};
use laserburn_core::{GrayscaleAlgorithm, Raster};

/// Convert one pixel to an intensity with the selected algorithm
pub fn to_intensity(algorithm: GrayscaleAlgorithm, r: u8, g: u8, b: u8) -> u8 {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    match algorithm {
        GrayscaleAlgorithm::Luminance => clamp_round(rf * 0.21 + gf * 0.71 + bf * 0.07),
        GrayscaleAlgorithm::Average => clamp_round((rf + gf + bf) / 3.0),
        GrayscaleAlgorithm::Red => r,
        GrayscaleAlgorithm::Green => g,
        GrayscaleAlgorithm::Blue => b,
        GrayscaleAlgorithm::Max => r.max(g).max(b),
        GrayscaleAlgorithm::Min => r.min(g).min(b),
    }
}

fn clamp_round(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Build the intensity grid for a raster, in raster orientation
/// (top-left origin). Alpha, if present, is ignored.
pub fn intensity_grid(raster: &Raster, algorithm: GrayscaleAlgorithm) -> GrayImage {
    let width = raster.width() as usize;
    GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        let (r, g, b) = raster.rgb_at(y as usize * width + x as usize);
        Luma([to_intensity(algorithm, r, g, b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_weights() {
        assert_eq!(to_intensity(GrayscaleAlgorithm::Luminance, 0, 0, 0), 0);
        // 0.21 + 0.71 + 0.07 = 0.99, so pure white lands just under 255
        assert_eq!(to_intensity(GrayscaleAlgorithm::Luminance, 255, 255, 255), 252);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Luminance, 100, 0, 0), 21);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Luminance, 0, 100, 0), 71);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Luminance, 0, 0, 100), 7);
    }

    #[test]
    fn test_average_rounds() {
        assert_eq!(to_intensity(GrayscaleAlgorithm::Average, 1, 1, 0), 1);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Average, 1, 0, 0), 0);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Average, 255, 255, 255), 255);
    }

    #[test]
    fn test_channel_selectors() {
        let (r, g, b) = (10, 200, 90);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Red, r, g, b), 10);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Green, r, g, b), 200);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Blue, r, g, b), 90);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Max, r, g, b), 200);
        assert_eq!(to_intensity(GrayscaleAlgorithm::Min, r, g, b), 10);
    }

    #[test]
    fn test_intensity_grid_orientation() {
        // 2x2 RGBA: black top-left, white elsewhere
        let pixels = vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 255, 255, 255, 255,
        ];
        let raster = Raster::new(2, 2, true, pixels).unwrap();
        let grid = intensity_grid(&raster, GrayscaleAlgorithm::Average);

        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get_pixel(0, 0).0[0], 0);
        assert_eq!(grid.get_pixel(1, 0).0[0], 255);
        assert_eq!(grid.get_pixel(0, 1).0[0], 255);
    }

    #[test]
    fn test_intensity_grid_non_square_rows() {
        // 3x2 RGB, each pixel's red channel is its row-major index
        let pixels = (0..6u8).flat_map(|i| [i * 40, 0, 0]).collect();
        let raster = Raster::new(3, 2, false, pixels).unwrap();
        let grid = intensity_grid(&raster, GrayscaleAlgorithm::Red);

        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.as_raw(), &vec![0, 40, 80, 120, 160, 200]);
        assert_eq!(grid.get_pixel(2, 0).0[0], 80);
        assert_eq!(grid.get_pixel(0, 1).0[0], 120);
    }
}

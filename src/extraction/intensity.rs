//! Per-frame signal strength measurement.
//!
//! Reduces one frame to a scalar by counting pixels whose color falls
//! inside the signal band. The band is expressed in HSV because hue
//! is stable across the brightness swings a blinking LED causes.

use crate::capture::Frame;
use serde::{Deserialize, Serialize};

/// HSV region treated as "signal color".
///
/// Hue is circular, so the band carries two sub-ranges in degrees
/// (0–360) to cover colors that straddle the wrap-around point.
/// Saturation and value minimums are on a 0–255 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorBand {
    /// Inclusive hue sub-ranges in degrees.
    pub hue_ranges: [(f32, f32); 2],
    /// Minimum saturation (0–255) for a pixel to count.
    pub min_saturation: u8,
    /// Minimum value (0–255) for a pixel to count.
    pub min_value: u8,
}

impl ColorBand {
    /// Band tuned for a red LED: hue within 20 degrees of either side
    /// of the wrap-around, strongly saturated, reasonably bright.
    pub fn red() -> Self {
        Self {
            hue_ranges: [(0.0, 20.0), (340.0, 360.0)],
            min_saturation: 120,
            min_value: 70,
        }
    }

    /// Checks that both hue sub-ranges are well-formed.
    pub fn is_valid(&self) -> bool {
        self.hue_ranges
            .iter()
            .all(|&(lo, hi)| (0.0..=360.0).contains(&lo) && (0.0..=360.0).contains(&hi) && lo <= hi)
    }

    /// Measures the signal strength of one frame: the number of
    /// pixels inside the band. A frame with no matching pixels
    /// yields 0.
    pub fn intensity(&self, frame: &Frame) -> f64 {
        frame
            .pixels()
            .chunks_exact(3)
            .filter(|px| self.contains(px[0], px[1], px[2]))
            .count() as f64
    }

    /// Tests a single RGB pixel against the band.
    fn contains(&self, r: u8, g: u8, b: u8) -> bool {
        let (hue, saturation, value) = rgb_to_hsv(r, g, b);
        saturation >= f32::from(self.min_saturation)
            && value >= f32::from(self.min_value)
            && self
                .hue_ranges
                .iter()
                .any(|&(lo, hi)| hue >= lo && hue <= hi)
    }
}

impl Default for ColorBand {
    fn default() -> Self {
        Self::red()
    }
}

/// Converts an RGB pixel to (hue in degrees 0–360, saturation 0–255,
/// value 0–255).
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let value = max;
    let saturation = if max == 0.0 { 0.0 } else { delta / max * 255.0 };
    let hue = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if max == gf {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };

    (hue, saturation, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_frame_full_intensity() {
        let band = ColorBand::red();
        let frame = Frame::solid([220, 24, 24], 8, 8, 1);

        assert_eq!(band.intensity(&frame), 64.0);
    }

    #[test]
    fn test_dark_frame_zero_intensity() {
        let band = ColorBand::red();
        let frame = Frame::solid([12, 12, 12], 8, 8, 1);

        assert_eq!(band.intensity(&frame), 0.0);
    }

    #[test]
    fn test_hue_wraparound_matches() {
        let band = ColorBand::red();
        // Red with a hint of blue: hue just below 360 degrees.
        assert!(band.contains(220, 20, 60));
    }

    #[test]
    fn test_washed_out_pixel_rejected() {
        let band = ColorBand::red();
        // Pale pink: red hue but low saturation.
        assert!(!band.contains(230, 190, 190));
    }

    #[test]
    fn test_green_rejected() {
        let band = ColorBand::red();
        assert!(!band.contains(20, 220, 20));
    }

    #[test]
    fn test_band_validation() {
        assert!(ColorBand::red().is_valid());

        let inverted = ColorBand {
            hue_ranges: [(20.0, 0.0), (340.0, 360.0)],
            ..ColorBand::red()
        };
        assert!(!inverted.is_valid());
    }
}

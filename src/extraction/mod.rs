//! Per-frame signal extraction.
//!
//! This module reduces each video frame to a binary LED state in two
//! steps: a color-band intensity measurement followed by adaptive
//! threshold detection.

mod detector;
mod intensity;

pub use detector::{LedState, StateDetector, ThresholdMode};
pub use intensity::ColorBand;

use crate::capture::Frame;

/// Extracts the LED state from a sequence of frames.
///
/// Combines the color-band intensity measurement with threshold
/// detection. One extractor serves exactly one segment; `reset`
/// prepares it for the next.
pub struct SignalExtractor {
    band: ColorBand,
    detector: StateDetector,
}

impl SignalExtractor {
    /// Creates an extractor for the given band and threshold mode.
    pub fn new(band: ColorBand, mode: ThresholdMode) -> Self {
        Self {
            band,
            detector: StateDetector::new(mode),
        }
    }

    /// Classifies one frame.
    pub fn process(&mut self, frame: &Frame) -> LedState {
        let intensity = self.band.intensity(frame);
        let state = self.detector.detect(intensity);
        tracing::trace!(
            sequence = frame.sequence(),
            intensity,
            state = ?state,
            "frame classified"
        );
        state
    }

    /// Clears detector state for a new segment.
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}

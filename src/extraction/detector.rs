//! Binary state detection over the intensity stream.
//!
//! A fixed threshold is unstable under varying ambient light and
//! camera distance. The adaptive mode tracks slow drift with an
//! exponential moving average while the instantaneous comparison
//! still catches the LED's own fast modulation, provided the
//! smoothing constant is small relative to the symbol rate.

use serde::{Deserialize, Serialize};

/// Observed LED state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    /// Signal intensity at or below the threshold.
    Off,
    /// Signal intensity above the threshold.
    On,
}

impl LedState {
    /// The bit symbol this state contributes to the bit string.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            LedState::Off => '0',
            LedState::On => '1',
        }
    }
}

/// Threshold strategy for state detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Compare against a constant intensity level.
    Fixed {
        /// Intensity above which the LED counts as lit.
        level: f64,
    },
    /// Compare against an exponential moving average of the intensity.
    Adaptive {
        /// EMA smoothing constant in (0, 1).
        alpha: f64,
    },
}

impl ThresholdMode {
    /// Default EMA smoothing constant.
    pub const DEFAULT_ALPHA: f64 = 0.05;
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::Adaptive {
            alpha: Self::DEFAULT_ALPHA,
        }
    }
}

/// Turns the intensity scalar stream into a binary state stream.
///
/// One detector exists per segment; the baseline never carries across
/// segment boundaries.
#[derive(Debug)]
pub struct StateDetector {
    mode: ThresholdMode,
    baseline: Option<f64>,
}

impl StateDetector {
    /// Creates a detector with the given threshold strategy.
    pub fn new(mode: ThresholdMode) -> Self {
        Self {
            mode,
            baseline: None,
        }
    }

    /// Classifies one intensity sample, updating the baseline.
    ///
    /// In adaptive mode the first sample seeds the baseline and
    /// reports `Off`: no signal has risen above a baseline that did
    /// not exist yet. Afterwards the baseline is EMA-updated first
    /// and the sample compared against the updated value.
    pub fn detect(&mut self, intensity: f64) -> LedState {
        match self.mode {
            ThresholdMode::Fixed { level } => {
                if intensity > level {
                    LedState::On
                } else {
                    LedState::Off
                }
            }
            ThresholdMode::Adaptive { alpha } => match self.baseline {
                None => {
                    self.baseline = Some(intensity);
                    LedState::Off
                }
                Some(previous) => {
                    let level = alpha * intensity + (1.0 - alpha) * previous;
                    self.baseline = Some(level);
                    if intensity > level {
                        LedState::On
                    } else {
                        LedState::Off
                    }
                }
            },
        }
    }

    /// Current adaptive baseline, if one has been seeded.
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Clears the baseline for a new segment.
    pub fn reset(&mut self) {
        self.baseline = None;
    }
}

//! Decode session configuration.
//!
//! All parameters carry defaults matching the reference transmitter:
//! 10 bits per second, 10-second segments, EMA smoothing of 0.05, and
//! a red signal band.

use crate::extraction::{ColorBand, ThresholdMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capture rate substituted when a source reports an unusable value.
pub const DEFAULT_CAPTURE_RATE: f64 = 30.0;

/// Parameters of one decode session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Transmitter symbol rate in bits per second.
    pub baud_rate: f64,
    /// Length of each independently decoded segment in seconds.
    pub chunk_duration_secs: f64,
    /// Decode 12-bit Hamming codewords (true) or raw 8-bit bytes.
    pub error_correction: bool,
    /// Threshold strategy for state detection.
    pub threshold: ThresholdMode,
    /// HSV region treated as signal color.
    pub color_band: ColorBand,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            baud_rate: 10.0,
            chunk_duration_secs: 10.0,
            error_correction: true,
            threshold: ThresholdMode::default(),
            color_band: ColorBand::red(),
        }
    }
}

impl DecodeConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.baud_rate.is_finite() || self.baud_rate <= 0.0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        if !self.chunk_duration_secs.is_finite() || self.chunk_duration_secs <= 0.0 {
            return Err(ConfigError::InvalidChunkDuration);
        }
        match self.threshold {
            ThresholdMode::Fixed { level } if !level.is_finite() || level < 0.0 => {
                return Err(ConfigError::InvalidThreshold)
            }
            ThresholdMode::Adaptive { alpha } if !(0.0..1.0).contains(&alpha) || alpha == 0.0 => {
                return Err(ConfigError::InvalidThreshold)
            }
            _ => {}
        }
        if !self.color_band.is_valid() {
            return Err(ConfigError::InvalidColorBand);
        }
        Ok(())
    }
}

/// Replaces an unusable reported capture rate with the default.
///
/// Sources report zero, negative, or NaN rates when the container
/// omits timing metadata; decoding needs a positive finite rate.
pub fn normalize_capture_rate(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        DEFAULT_CAPTURE_RATE
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Baud rate was zero, negative, or not finite.
    #[error("invalid baud rate (must be positive)")]
    InvalidBaudRate,
    /// Chunk duration was zero, negative, or not finite.
    #[error("invalid chunk duration (must be positive)")]
    InvalidChunkDuration,
    /// Threshold level or smoothing constant out of range.
    #[error("invalid threshold (fixed level must be non-negative, alpha in (0, 1))")]
    InvalidThreshold,
    /// Hue ranges malformed.
    #[error("invalid color band (hue ranges must be ordered within 0-360 degrees)")]
    InvalidColorBand,
    /// Configuration file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// Configuration file did not parse as TOML.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Decode session parameters.
    #[serde(default)]
    pub decode: DecodeConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.decode.validate()?;
        Ok(config)
    }
}

//! Frame source abstraction.
//!
//! This module provides a trait-based abstraction over video input,
//! allowing for file readers, webcams, and synthetic implementations
//! for testing. The source is treated as a lazy, single-pass stream
//! of frames; end-of-stream is an explicit signal, not an error.

use super::Frame;
use crate::decode::hamming;
use thiserror::Error;

/// Errors that can occur while acquiring frames.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be opened. Fatal to the decode session.
    #[error("frame source unavailable: {0}")]
    Unavailable(String),
    /// A frame read failed after the source was opened.
    #[error("failed to read frame: {0}")]
    ReadFailed(String),
    /// The source was used before `open` succeeded.
    #[error("frame source not opened")]
    NotOpened,
}

/// Trait for video frame sources.
///
/// Implementations produce a finite, sequential, non-restartable
/// stream of frames. Blocking behavior during acquisition is the
/// implementation's concern; the decode pipeline only requires that
/// frames arrive in order.
pub trait FrameSource {
    /// Opens the source and prepares it for reading.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Returns the reported capture rate in frames per second.
    ///
    /// The value is forwarded as reported; callers normalize invalid
    /// rates (zero, negative, NaN) to a default.
    fn capture_rate(&self) -> f64;

    /// Reads the next frame, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Number of idle (LED off) bit periods emitted before and after a
/// synthetic burst, letting the adaptive detector seed its baseline.
const IDLE_BITS: usize = 2;

/// Length of the alternating preamble/postamble the transmitter wraps
/// around each burst.
const PREAMBLE_BITS: usize = 8;

/// RGB color of a lit frame (saturated red, inside the default band).
const ON_RGB: [u8; 3] = [220, 24, 24];

/// RGB color of an unlit frame (dark, outside any band).
const OFF_RGB: [u8; 3] = [12, 12, 12];

/// Synthetic source that renders an encoded message as blinking
/// solid-color frames.
///
/// Mimics the LED transmitter: each byte becomes a 12-bit Hamming
/// codeword sent most-significant bit first, the whole burst wrapped
/// in an 8-bit alternating preamble and postamble, with idle periods
/// on both sides.
#[derive(Debug)]
pub struct SyntheticBlinkSource {
    bits: Vec<bool>,
    frames_per_bit: usize,
    fps: f64,
    width: u32,
    height: u32,
    cursor: u64,
    opened: bool,
}

impl SyntheticBlinkSource {
    /// Creates a source that transmits `message` at the given capture
    /// and symbol rates.
    pub fn new(message: &str, fps: f64, baud_rate: f64) -> Self {
        let mut bits = vec![false; IDLE_BITS];
        bits.extend(Self::burst_bits(message));
        bits.extend(std::iter::repeat(false).take(IDLE_BITS));

        let frames_per_bit = (fps / baud_rate).round().max(1.0) as usize;
        Self::from_bits(bits, fps, frames_per_bit)
    }

    /// Creates a source from an explicit modulation pattern.
    pub fn from_bits(bits: Vec<bool>, fps: f64, frames_per_bit: usize) -> Self {
        Self {
            bits,
            frames_per_bit: frames_per_bit.max(1),
            fps,
            width: 64,
            height: 48,
            cursor: 0,
            opened: false,
        }
    }

    /// Modulation pattern for one transmitter burst: preamble,
    /// codewords MSB-first, postamble.
    pub fn burst_bits(message: &str) -> Vec<bool> {
        let mut bits: Vec<bool> = (0..PREAMBLE_BITS).map(|i| i % 2 == 1).collect();
        for byte in message.bytes() {
            let codeword = hamming::encode(byte);
            for pos in (0..hamming::CODEWORD_BITS).rev() {
                bits.push(codeword >> pos & 1 == 1);
            }
        }
        bits.extend((0..PREAMBLE_BITS).map(|i| i % 2 == 1));
        bits
    }

    /// Total number of frames this source will produce.
    pub fn frame_count(&self) -> usize {
        self.bits.len() * self.frames_per_bit
    }
}

impl FrameSource for SyntheticBlinkSource {
    fn open(&mut self) -> Result<(), SourceError> {
        self.cursor = 0;
        self.opened = true;
        tracing::info!(
            bits = self.bits.len(),
            frames_per_bit = self.frames_per_bit,
            "SyntheticBlinkSource opened"
        );
        Ok(())
    }

    fn capture_rate(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if !self.opened {
            return Err(SourceError::NotOpened);
        }

        let bit_index = (self.cursor as usize) / self.frames_per_bit;
        let Some(&lit) = self.bits.get(bit_index) else {
            return Ok(None);
        };

        self.cursor += 1;
        let rgb = if lit { ON_RGB } else { OFF_RGB };
        Ok(Some(Frame::solid(rgb, self.width, self.height, self.cursor)))
    }

    fn is_open(&self) -> bool {
        self.opened
    }

    fn close(&mut self) {
        self.opened = false;
        tracing::info!("SyntheticBlinkSource closed");
    }
}

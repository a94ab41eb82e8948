//! Bit string assembly from state-transition timing.
//!
//! The transmitter holds the LED in one state for a whole number of
//! bit periods, so the receiver recovers bits by measuring how long
//! each detected state lasted and rounding to the nearest bit count.
//! Rounding is the robustness mechanism against frame-timing jitter
//! and non-integer frames-per-bit ratios.

use crate::extraction::LedState;

/// Fixed pad every bit string starts with.
///
/// Guarantees the phase aligner head-room and absorbs detector
/// startup noise.
pub const START_PAD: &str = "000";

/// Ordered sequence of `'0'`/`'1'` symbols recovered from one
/// segment.
#[derive(Clone, PartialEq, Eq)]
pub struct BitString {
    symbols: String,
}

impl BitString {
    /// Creates a bit string holding only the startup pad.
    pub fn new() -> Self {
        Self {
            symbols: String::from(START_PAD),
        }
    }

    /// Appends `count` copies of the state's symbol.
    pub fn push_run(&mut self, state: LedState, count: usize) {
        self.symbols
            .extend(std::iter::repeat(state.symbol()).take(count));
    }

    /// Number of symbols, pad included.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if no symbols are present (never the case for a bit
    /// string built through `new`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.symbols
    }

    /// Iterates consecutive 8-bit groups as bytes, MSB-first,
    /// discarding a trailing fragment.
    ///
    /// This is the unprotected decode path: no alignment search, no
    /// parity, and the startup pad stays part of the byte stream.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.symbols
            .as_bytes()
            .chunks_exact(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &s| acc << 1 | u8::from(s == b'1')))
    }
}

impl Default for BitString {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitString")
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

/// Converts state-transition timings into a bit string.
///
/// Tracks the frame index of the last state change; when the state
/// flips, the closed run is converted to `round(duration /
/// frames_per_bit)` repeated symbols. One reconstructor serves
/// exactly one segment.
#[derive(Debug)]
pub struct RunReconstructor {
    frames_per_bit: f64,
    last_state: LedState,
    transition_frame: u64,
    bits: BitString,
}

impl RunReconstructor {
    /// Creates a reconstructor for the given frames-per-bit ratio.
    ///
    /// The ratio comes from the capture rate and the transmitter's
    /// baud rate; callers guarantee it is positive and finite.
    pub fn new(frames_per_bit: f64) -> Self {
        Self {
            frames_per_bit,
            last_state: LedState::Off,
            transition_frame: 0,
            bits: BitString::new(),
        }
    }

    /// Feeds the detected state of the frame at `frame_index`.
    ///
    /// Frames must arrive in order; only state changes extend the bit
    /// string.
    pub fn observe(&mut self, frame_index: u64, state: LedState) {
        if state != self.last_state {
            let duration = frame_index - self.transition_frame;
            self.bits.push_run(self.last_state, self.run_bits(duration));
            self.transition_frame = frame_index;
            self.last_state = state;
        }
    }

    /// Flushes the trailing run and returns the finished bit string.
    ///
    /// `total_frames` is the segment length; the final open run is
    /// closed against it with the same rounding rule.
    pub fn finish(mut self, total_frames: u64) -> BitString {
        let duration = total_frames - self.transition_frame;
        self.bits.push_run(self.last_state, self.run_bits(duration));
        self.bits
    }

    fn run_bits(&self, duration: u64) -> usize {
        (duration as f64 / self.frames_per_bit).round() as usize
    }
}

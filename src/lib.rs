//! LED Optical Signal Decoder
//!
//! Demodulates a binary data stream transmitted as an optically
//! modulated signal (an LED blinking in a reserved color band),
//! captured as video frames, and recovers the original text through
//! a Hamming(12,8) forward-error-correcting block code.
//!
//! # Architecture
//!
//! Data flows strictly forward:
//!
//! ```text
//! frames → intensity → state → bit runs → alignment → text
//!   capture     extraction        decode         driver
//! ```
//!
//! The frame source and the display surface are external
//! collaborators behind the [`capture::FrameSource`] and
//! [`driver::DecodeSink`] traits; everything between them is pure,
//! single-threaded decoding.
//!
//! # Design Principles
//!
//! - **Per-segment isolation**: each fixed-duration segment is
//!   decoded with fresh detector and bit-string state.
//! - **Rounding as jitter defense**: state durations are rounded to
//!   whole bit periods, absorbing frame-timing noise.
//! - **Alignment by decode success**: codeword boundaries are
//!   recovered by trying all 12 offsets and keeping the one with the
//!   most clean decodes.
//! - **Correct-and-flag**: a nonzero syndrome is repaired but the
//!   block never counts as clean; uncorrectable blocks are dropped,
//!   not guessed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use ledlink::{
//!     capture::{Frame, FrameSource, SyntheticBlinkSource},
//!     config::DecodeConfig,
//!     driver::{DecodeSink, SegmentDriver},
//! };
//!
//! struct Printer;
//!
//! impl DecodeSink for Printer {
//!     fn on_preview_frame(&mut self, _frame: &Frame) {}
//!     fn on_segment_text(&mut self, text: &str) {
//!         println!("{text}");
//!     }
//! }
//!
//! let mut source = SyntheticBlinkSource::new("HELLO", 30.0, 10.0);
//! source.open().unwrap();
//!
//! let driver = SegmentDriver::new(DecodeConfig::default());
//! let stop = AtomicBool::new(false);
//! driver.run(&mut source, &mut Printer, &stop).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod decode;
pub mod driver;
pub mod extraction;

// Re-export commonly used types at crate root
pub use capture::{Frame, FrameSource, SourceError, SyntheticBlinkSource};
pub use config::{DecodeConfig, FileConfig};
pub use decode::{best_alignment, AlignedDecode, BitString, RunReconstructor};
pub use driver::{DecodeReport, DecodeSink, SegmentDriver};
pub use extraction::{ColorBand, LedState, SignalExtractor, StateDetector, ThresholdMode};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

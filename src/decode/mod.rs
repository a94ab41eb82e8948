//! Bit-level decoding.
//!
//! Converts detected LED states into text: run-length bit
//! reconstruction, phase alignment search, and the Hamming(12,8)
//! block code.

mod align;
mod bitstream;
pub mod hamming;

pub use align::{best_alignment, AlignedDecode};
pub use bitstream::{BitString, RunReconstructor, START_PAD};

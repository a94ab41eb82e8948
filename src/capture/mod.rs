//! Video input and frame handling.
//!
//! This module provides abstractions for acquiring frames from a
//! video source and the frame type itself. The source is treated as
//! an external collaborator that supplies frames in order; everything
//! downstream of it is pure decoding.

mod frame;
mod source;

pub use frame::Frame;
pub use source::{FrameSource, SourceError, SyntheticBlinkSource};

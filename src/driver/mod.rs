//! Segment driver.
//!
//! Partitions the incoming frame stream into fixed-duration segments
//! and decodes each one independently: intensity extraction, state
//! detection, bit-run reconstruction, and phase alignment run over
//! the buffered frames of exactly one segment at a time. Nothing
//! carries across segment boundaries.

use crate::capture::{Frame, FrameSource, SourceError};
use crate::config::{normalize_capture_rate, DecodeConfig};
use crate::decode::{best_alignment, RunReconstructor};
use crate::extraction::SignalExtractor;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receiver of driver output.
///
/// Implemented by the display/output shell; the core never knows what
/// is behind it. `on_preview_frame` is fired for every frame read,
/// `on_segment_text` once per decoded segment (the text may be
/// empty).
pub trait DecodeSink {
    /// Called with each raw frame, for preview purposes only.
    fn on_preview_frame(&mut self, frame: &Frame);

    /// Called with the decoded text of each completed segment.
    fn on_segment_text(&mut self, text: &str);
}

/// Counters describing one finished decode session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Frames read from the source.
    pub frames: u64,
    /// Segments decoded and emitted.
    pub segments: usize,
    /// True if the session ended on the stop signal rather than
    /// end of stream.
    pub stopped: bool,
}

/// Drives the decode pipeline over a frame source.
pub struct SegmentDriver {
    config: DecodeConfig,
}

impl SegmentDriver {
    /// Creates a driver with the given session configuration.
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Consumes the source until end of stream or stop.
    ///
    /// The source must already be open; it is closed before this
    /// returns. The stop flag is checked between frames: a stop
    /// mid-segment discards the partially accumulated segment
    /// without output. A source error is fatal and propagates
    /// immediately.
    pub fn run<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        stop: &AtomicBool,
    ) -> Result<DecodeReport, SourceError>
    where
        S: FrameSource + ?Sized,
        K: DecodeSink + ?Sized,
    {
        let result = self.pump(source, sink, stop);
        source.close();
        result
    }

    fn pump<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        stop: &AtomicBool,
    ) -> Result<DecodeReport, SourceError>
    where
        S: FrameSource + ?Sized,
        K: DecodeSink + ?Sized,
    {
        let capture_rate = normalize_capture_rate(source.capture_rate());
        let segment_len = ((capture_rate * self.config.chunk_duration_secs) as usize).max(1);
        let frames_per_bit = capture_rate / self.config.baud_rate;

        tracing::info!(
            capture_rate,
            segment_len,
            frames_per_bit,
            error_correction = self.config.error_correction,
            "decode session started"
        );

        let mut report = DecodeReport::default();
        let mut frames: Vec<Frame> = Vec::with_capacity(segment_len);

        loop {
            if stop.load(Ordering::Relaxed) {
                tracing::info!(discarded = frames.len(), "stop requested");
                report.stopped = true;
                return Ok(report);
            }

            let Some(frame) = source.next_frame()? else {
                break;
            };
            sink.on_preview_frame(&frame);
            frames.push(frame);
            report.frames += 1;

            if frames.len() == segment_len {
                self.flush_segment(&mut frames, frames_per_bit, sink, &mut report);
            }
        }

        // Final partial segment, if the stream ended mid-chunk.
        if !frames.is_empty() {
            self.flush_segment(&mut frames, frames_per_bit, sink, &mut report);
        }

        tracing::info!(
            frames = report.frames,
            segments = report.segments,
            "decode session finished"
        );
        Ok(report)
    }

    fn flush_segment<K>(
        &self,
        frames: &mut Vec<Frame>,
        frames_per_bit: f64,
        sink: &mut K,
        report: &mut DecodeReport,
    ) where
        K: DecodeSink + ?Sized,
    {
        let text = self.decode_segment(frames, frames_per_bit);
        tracing::debug!(
            frames = frames.len(),
            chars = text.len(),
            "segment decoded"
        );
        sink.on_segment_text(&text);
        frames.clear();
        report.segments += 1;
    }

    /// Decodes one segment's frames to text.
    ///
    /// A fresh extractor and reconstructor serve each call, so state
    /// never leaks between segments.
    pub fn decode_segment(&self, frames: &[Frame], frames_per_bit: f64) -> String {
        let mut extractor =
            SignalExtractor::new(self.config.color_band.clone(), self.config.threshold);
        let mut reconstructor = RunReconstructor::new(frames_per_bit);

        for (index, frame) in frames.iter().enumerate() {
            let state = extractor.process(frame);
            reconstructor.observe(index as u64, state);
        }
        let bits = reconstructor.finish(frames.len() as u64);

        if self.config.error_correction {
            best_alignment(&bits).text
        } else {
            bits.bytes().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SyntheticBlinkSource;

    #[derive(Default)]
    struct RecordingSink {
        previews: u64,
        segments: Vec<String>,
    }

    impl DecodeSink for RecordingSink {
        fn on_preview_frame(&mut self, _frame: &Frame) {
            self.previews += 1;
        }

        fn on_segment_text(&mut self, text: &str) {
            self.segments.push(text.to_string());
        }
    }

    fn run_driver(
        config: DecodeConfig,
        source: &mut SyntheticBlinkSource,
    ) -> (DecodeReport, RecordingSink) {
        source.open().unwrap();
        let mut sink = RecordingSink::default();
        let stop = AtomicBool::new(false);
        let report = SegmentDriver::new(config).run(source, &mut sink, &stop).unwrap();
        (report, sink)
    }

    /// Burst padded with idle bits to an exact total bit count.
    fn padded_burst(message: &str, lead: usize, total: usize) -> Vec<bool> {
        let mut bits = vec![false; lead];
        bits.extend(SyntheticBlinkSource::burst_bits(message));
        assert!(bits.len() <= total);
        bits.resize(total, false);
        bits
    }

    #[test]
    fn test_loopback_single_segment() {
        let mut source = SyntheticBlinkSource::new("HELLO WORLD", 30.0, 10.0);
        let config = DecodeConfig {
            chunk_duration_secs: 20.0,
            ..DecodeConfig::default()
        };

        let (report, sink) = run_driver(config, &mut source);

        assert_eq!(sink.segments, vec!["HELLO WORLD".to_string()]);
        assert_eq!(report.frames, 456);
        assert_eq!(sink.previews, 456);
        assert!(!report.stopped);
        assert!(!source.is_open());
    }

    #[test]
    fn test_exact_segment_boundary_yields_one_segment() {
        // 100 bits at 3 frames per bit: 300 frames, exactly one
        // 10-second segment at 30 fps.
        let bits = padded_burst("SIGNAL", 2, 100);
        let mut source = SyntheticBlinkSource::from_bits(bits, 30.0, 3);

        let (report, sink) = run_driver(DecodeConfig::default(), &mut source);

        assert_eq!(report.frames, 300);
        assert_eq!(report.segments, 1);
        assert_eq!(sink.segments, vec!["SIGNAL".to_string()]);
    }

    #[test]
    fn test_two_segments_decode_independently() {
        let mut bits = padded_burst("FIRST", 2, 100);
        bits.extend(padded_burst("SECOND", 2, 100));
        let mut source = SyntheticBlinkSource::from_bits(bits, 30.0, 3);

        let (report, sink) = run_driver(DecodeConfig::default(), &mut source);

        assert_eq!(report.segments, 2);
        // The first segment's zero-fill forms one all-zero codeword,
        // which decodes as a clean NUL.
        assert_eq!(sink.segments[0], "FIRST\u{0}");
        assert_eq!(sink.segments[1], "SECOND");
    }

    #[test]
    fn test_empty_stream_emits_nothing() {
        let mut source = SyntheticBlinkSource::from_bits(Vec::new(), 30.0, 3);

        let (report, sink) = run_driver(DecodeConfig::default(), &mut source);

        assert_eq!(report.frames, 0);
        assert_eq!(report.segments, 0);
        assert!(sink.segments.is_empty());
    }

    #[test]
    fn test_sub_bit_stream_decodes_to_empty_text() {
        // One frame is shorter than one bit period: the segment's bit
        // string is just the startup pad.
        let mut source = SyntheticBlinkSource::from_bits(vec![false], 30.0, 1);

        let (report, sink) = run_driver(DecodeConfig::default(), &mut source);

        assert_eq!(report.frames, 1);
        assert_eq!(sink.segments, vec![String::new()]);
    }

    #[test]
    fn test_stop_discards_partial_segment() {
        let mut source = SyntheticBlinkSource::new("HELLO", 30.0, 10.0);
        source.open().unwrap();
        let mut sink = RecordingSink::default();
        let stop = AtomicBool::new(true);

        let report = SegmentDriver::new(DecodeConfig::default())
            .run(&mut source, &mut sink, &stop)
            .unwrap();

        assert!(report.stopped);
        assert_eq!(report.frames, 0);
        assert!(sink.segments.is_empty());
    }

    #[test]
    fn test_invalid_capture_rate_falls_back_to_default() {
        // Source reports 0 fps; the driver must assume 30, making
        // these 300 frames exactly one segment.
        let bits = padded_burst("SIGNAL", 2, 100);
        let mut source = SyntheticBlinkSource::from_bits(bits, 0.0, 3);

        let (report, sink) = run_driver(DecodeConfig::default(), &mut source);

        assert_eq!(report.segments, 1);
        assert_eq!(sink.segments, vec!["SIGNAL".to_string()]);
    }

    #[test]
    fn test_raw_mode_skips_alignment() {
        // Unprotected 8-bit decode: pad + bits map straight to bytes.
        let config = DecodeConfig {
            error_correction: false,
            ..DecodeConfig::default()
        };
        // Bits "01000" after the pad: "00001000" is one byte, 0x08.
        let bits = vec![false, true, false, false, false];
        let mut source = SyntheticBlinkSource::from_bits(bits, 30.0, 3);

        let (_, sink) = run_driver(config, &mut source);

        assert_eq!(sink.segments, vec!["\u{8}".to_string()]);
    }
}

//! LED Signal Decoder CLI
//!
//! Command-line interface for testing and demonstrating the decode
//! pipeline against a synthetic blinking-LED source.

use clap::Parser;
use ledlink::{
    capture::{Frame, FrameSource, SyntheticBlinkSource},
    config::{DecodeConfig, FileConfig},
    driver::{DecodeSink, SegmentDriver},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "ledlink", version, about = "Decode text from a blinking LED")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message transmitted by the synthetic source.
    #[arg(long, default_value = "HELLO")]
    message: String,

    /// Capture rate of the synthetic source in frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
}

/// Sink that prints decoded segments to stdout.
#[derive(Default)]
struct ConsoleSink {
    segment: usize,
}

impl DecodeSink for ConsoleSink {
    fn on_preview_frame(&mut self, _frame: &Frame) {
        // Headless demo: no preview surface.
    }

    fn on_segment_text(&mut self, text: &str) {
        self.segment += 1;
        println!("segment {}: {}", self.segment, text);
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("LED Signal Decoder v{}", ledlink::VERSION);

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(file) => file.decode,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        },
        None => DecodeConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || {
            stop.store(true, Ordering::Relaxed);
        }) {
            warn!("Failed to install Ctrl-C handler: {e}");
        }
    }

    let mut source = SyntheticBlinkSource::new(&cli.message, cli.fps, config.baud_rate);
    if let Err(e) = source.open() {
        eprintln!("Failed to open frame source: {e}");
        std::process::exit(1);
    }

    info!(
        frames = source.frame_count(),
        fps = cli.fps,
        "decoding synthetic transmission"
    );

    let driver = SegmentDriver::new(config);
    let mut sink = ConsoleSink::default();
    match driver.run(&mut source, &mut sink, &stop) {
        Ok(report) => {
            info!(
                frames = report.frames,
                segments = report.segments,
                stopped = report.stopped,
                "done"
            );
        }
        Err(e) => {
            eprintln!("Decode failed: {e}");
            std::process::exit(1);
        }
    }
}

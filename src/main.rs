use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use jumpcut::{config::Config, pipeline::JumpcutEngine};

#[derive(Parser)]
#[command(
    name = "jumpcut",
    version,
    about = "Shorten videos by fast-forwarding through silence",
    long_about = "Jumpcut analyzes a video's audio track, plays silent passages at a \
                  higher speed (or skips them entirely) and keeps spoken passages at \
                  their original pace, producing a shorter file with picture and sound \
                  in sync."
)]
struct Cli {
    /// The video file to retime
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (defaults to the input name with _ALTERED appended)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Normalized volume a passage must reach to count as sounded (0.0-1.0)
    #[arg(long)]
    silent_threshold: Option<f64>,

    /// Playback speed for sounded passages, typically 1.0
    #[arg(long)]
    sounded_speed: Option<f64>,

    /// Playback speed for silent passages; 999999 for hard jump cuts
    #[arg(long)]
    silent_speed: Option<f64>,

    /// Silent windows on either side of speech kept at sounded speed
    #[arg(long)]
    frame_margin: Option<u32>,

    /// Sample rate used when the input's audio stream cannot be probed (Hz)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Frame rate used when the input's video stream cannot be probed
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Quality of extracted frames (1 best - 31 worst)
    #[arg(long)]
    frame_quality: Option<u8>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Overlay explicit command-line flags onto the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(threshold) = self.silent_threshold {
            config.audio.silence_threshold = threshold;
        }
        if let Some(speed) = self.sounded_speed {
            config.audio.sounded_speed = speed;
        }
        if let Some(speed) = self.silent_speed {
            config.audio.silent_speed = speed;
        }
        if let Some(margin) = self.frame_margin {
            config.video.frame_margin = margin;
        }
        if let Some(rate) = self.sample_rate {
            config.audio.sample_rate = rate;
        }
        if let Some(rate) = self.frame_rate {
            config.video.frame_rate = rate;
        }
        if let Some(quality) = self.frame_quality {
            config.video.frame_quality = quality;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting jumpcut v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration and overlay CLI flags
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    cli.apply_to(&mut config);
    config.validate()?;

    let engine = JumpcutEngine::new(config);
    engine.process(&cli.input, cli.output.as_ref()).await?;

    Ok(())
}

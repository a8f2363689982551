//! # Jumpcut
//!
//! Automatically shorten recorded videos by playing silent passages faster
//! (or skipping them) while speech keeps its original pace, with picture and
//! sound staying in sync.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jumpcut::{config::Config, pipeline::JumpcutEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let engine = JumpcutEngine::new(config);
//! engine.process("lecture.mp4", Some("lecture_short.mp4")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The pipeline analyzes the whole audio track before any output is made:
//!
//! - [`audio`] - loudness analysis, time stretching and resynthesis
//! - [`timeline`] - segmentation of windows into speed-tagged chunks
//! - [`video`] - frame remapping with last-good-frame fallback
//! - [`media`] - ffmpeg/ffprobe orchestration
//! - [`pipeline`] - the engine tying the steps together
//!
//! ## Custom time stretchers
//!
//! The stock stretcher is a phase vocoder, but any implementation of
//! [`TimeStretcher`](audio::TimeStretcher) can be plugged in:
//!
//! ```rust,no_run
//! use jumpcut::audio::TimeStretcher;
//! use jumpcut::error::Result;
//!
//! struct MyStretcher;
//!
//! impl TimeStretcher for MyStretcher {
//!     fn stretch(&self, samples: &[f32], channels: usize, speed: f64) -> Result<Vec<f32>> {
//!         // Your resampling implementation
//!         Ok(samples.to_vec())
//!     }
//! }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod timeline;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{JumpcutError, Result},
    pipeline::JumpcutEngine,
    timeline::{Chunk, SpeedClass, SpeedTable},
};

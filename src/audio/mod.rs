//! # Audio Analysis and Resynthesis Module
//!
//! Everything that touches PCM: per-window loudness analysis, the
//! phase-vocoder time-stretch primitive, chunk-by-chunk resynthesis of the
//! output track, and WAV file I/O.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jumpcut::audio::{LoudnessAnalyzer, WavLoader};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let audio = WavLoader::load("audio.wav").await?;
//!
//! let analyzer = LoudnessAnalyzer::new(0.03, 30.0);
//! let profile = analyzer.analyze(&audio)?;
//!
//! println!("{} loud windows", profile.loud.iter().filter(|&&l| l).count());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod loader;
pub mod resynth;
pub mod stretch;
pub mod types;

pub use analyzer::LoudnessAnalyzer;
pub use loader::WavLoader;
pub use resynth::{AudioResynthesizer, ResynthOutput};
pub use stretch::{PhaseVocoder, TimeStretcher};
pub use types::{AudioData, LoudnessProfile};

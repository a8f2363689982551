//! # Timeline Segmentation Module
//!
//! Turns per-window loudness decisions into an ordered list of chunks, each
//! tagged with the playback speed class the whole run shares. The chunk list
//! drives both the audio resynthesizer and the frame remapper.

pub mod segmenter;
pub mod types;

pub use segmenter::ChunkSegmenter;
pub use types::{Chunk, SampleSpan, SpeedClass, SpeedTable};

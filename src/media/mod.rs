//! # External Media Tooling Module
//!
//! Thin wrappers around ffmpeg/ffprobe: stream probing, frame and audio
//! extraction into a scratch workspace, and the final mux. Nothing in here
//! touches PCM or frame contents.

pub mod extractor;
pub mod muxer;
pub mod probe;
pub mod workspace;

pub use extractor::MediaExtractor;
pub use muxer::{altered_output_path, Muxer};
pub use probe::MediaProbe;
pub use workspace::Workspace;

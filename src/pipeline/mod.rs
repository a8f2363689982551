//! # Pipeline Engine
//!
//! Orchestrates probing, extraction, retiming, frame remapping and muxing
//! for one input file.

pub mod engine;

pub use engine::{JumpcutEngine, RetimeResult};

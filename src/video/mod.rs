//! # Video Frame Remapping Module
//!
//! Builds the output frame sequence from the retimed audio. Frames are
//! opaque byte blobs to this layer; it only decides *which* input frame
//! every output slot shows.

pub mod remapper;
pub mod store;

pub use remapper::{FrameRemapper, RemapReport};
pub use store::{
    DirFrameSink, DirFrameStore, FrameSink, FrameStore, MemoryFrameSink, MemoryFrameStore,
};

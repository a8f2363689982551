use serde::{Deserialize, Serialize};

use crate::error::{AudioError, Result};

/// Playback class of a run of analysis windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedClass {
    /// Silent passage, played at the fast speed
    Silent,

    /// Sounded passage, played at the normal speed
    Sounded,
}

impl SpeedClass {
    /// Classify an inclusion flag
    pub fn from_included(included: bool) -> Self {
        if included {
            Self::Sounded
        } else {
            Self::Silent
        }
    }
}

/// A contiguous run of analysis windows sharing one speed class
///
/// Window indices are half-open: the chunk covers `[start, end)`. The index
/// space is the output-frame index space, so a chunk also identifies which
/// slice of the source video it retimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First window index covered by this chunk
    pub start: u64,

    /// One past the last window index covered by this chunk
    pub end: u64,

    /// Speed class shared by every window in the chunk
    pub class: SpeedClass,
}

impl Chunk {
    pub fn new(start: u64, end: u64, class: SpeedClass) -> Self {
        Self { start, end, class }
    }

    /// Number of windows in the chunk
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// The two playback multipliers for a run, immutable once built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable {
    silent: f64,
    sounded: f64,
}

impl SpeedTable {
    /// Build a speed table, rejecting non-positive multipliers
    pub fn new(silent: f64, sounded: f64) -> Result<Self> {
        for speed in [silent, sounded] {
            if !(speed > 0.0) {
                return Err(AudioError::InvalidSpeed { speed }.into());
            }
        }

        Ok(Self { silent, sounded })
    }

    /// Multiplier for the given speed class
    pub fn speed_for(&self, class: SpeedClass) -> f64 {
        match class {
            SpeedClass::Silent => self.silent,
            SpeedClass::Sounded => self.sounded,
        }
    }
}

/// Half-open range of output sample frames occupied by one chunk's audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpan {
    /// First output sample frame of the chunk's audio
    pub start: u64,

    /// One past the last output sample frame
    pub end: u64,
}

impl SampleSpan {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Length of the span in sample frames
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

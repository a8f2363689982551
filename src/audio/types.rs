use std::path::PathBuf;

/// Raw audio data with metadata
///
/// Samples are interleaved f32 in [-1, 1]. All window and span arithmetic in
/// the pipeline is done in *sample frames* (one sample per channel), so a
/// stereo buffer of 1000 frames holds 2000 samples.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved audio samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Original file path, when loaded from disk
    pub file_path: Option<PathBuf>,
}

impl AudioData {
    /// Create audio data from an interleaved sample buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
            file_path: None,
        }
    }

    /// Total number of sample frames (samples per channel)
    pub fn frame_count(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.samples.len() / self.channels as usize) as u64
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Interleaved samples for the half-open frame range `[start, end)`
    ///
    /// The range is clamped to the buffer, so an out-of-range tail window
    /// yields an empty slice rather than a panic.
    pub fn frame_slice(&self, start: u64, end: u64) -> &[f32] {
        let channels = self.channels.max(1) as usize;
        let total = self.samples.len();

        let lo = ((start as usize).saturating_mul(channels)).min(total);
        let hi = ((end as usize).saturating_mul(channels)).min(total).max(lo);

        &self.samples[lo..hi]
    }

    /// Peak absolute amplitude across all channels
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }
}

/// Per-window loudness decisions for a whole track, computed once per run
#[derive(Debug, Clone)]
pub struct LoudnessProfile {
    /// One flag per analysis window, true when the window is loud
    pub loud: Vec<bool>,

    /// Global peak amplitude the flags were normalized against
    pub max_volume: f32,

    /// Analysis window length in sample frames (real-valued, not rounded)
    pub samples_per_window: f64,
}

impl LoudnessProfile {
    /// Number of analysis windows, equal to the output frame index space
    pub fn window_count(&self) -> u64 {
        self.loud.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_interleaved() {
        let stereo = AudioData::new(vec![0.0; 10], 44100, 2);
        assert_eq!(stereo.frame_count(), 5);

        let mono = AudioData::new(vec![0.0; 10], 44100, 1);
        assert_eq!(mono.frame_count(), 10);
    }

    #[test]
    fn test_frame_slice_interleaving() {
        // L R pairs: (1,2) (3,4) (5,6)
        let data = AudioData::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 44100, 2);
        assert_eq!(data.frame_slice(1, 3), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_frame_slice_clamps_to_buffer() {
        let data = AudioData::new(vec![1.0, 2.0, 3.0, 4.0], 44100, 2);
        assert_eq!(data.frame_slice(1, 99), &[3.0, 4.0]);
        assert!(data.frame_slice(7, 9).is_empty());
    }

    #[test]
    fn test_peak() {
        let data = AudioData::new(vec![0.1, -0.9, 0.5], 44100, 1);
        assert_eq!(data.peak(), 0.9);
    }
}

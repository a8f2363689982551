use tracing::{debug, info};

use crate::audio::types::{AudioData, LoudnessProfile};
use crate::error::{AudioError, Result};

/// Classifies fixed-duration analysis windows of a track as loud or silent
///
/// One analysis window corresponds to exactly one output video frame, so the
/// window length is `sample_rate / frame_rate` sample frames. That ratio is
/// kept as a real number and window boundaries are truncated per window;
/// rounding it up front would drift the chunk boundaries on non-integral
/// ratios and cascade into off-by-one frame mappings downstream.
pub struct LoudnessAnalyzer {
    silence_threshold: f64,
    frame_rate: f64,
}

impl LoudnessAnalyzer {
    pub fn new(silence_threshold: f64, frame_rate: f64) -> Self {
        Self {
            silence_threshold,
            frame_rate,
        }
    }

    /// Compute per-window loudness flags for the whole track
    ///
    /// Fails with `DegenerateInput` when the track's peak amplitude is zero,
    /// since the threshold comparison is undefined for all-silent input.
    pub fn analyze(&self, audio: &AudioData) -> Result<LoudnessProfile> {
        let samples_per_window = audio.sample_rate as f64 / self.frame_rate;
        let total_frames = audio.frame_count();
        let window_count = (total_frames as f64 / samples_per_window).ceil() as u64;

        info!(
            "Analyzing loudness: {:.1}s of audio, {} windows of {:.2} frames",
            audio.duration(),
            window_count,
            samples_per_window
        );

        let max_volume = audio.peak();
        if max_volume == 0.0 {
            return Err(AudioError::DegenerateInput.into());
        }

        let mut loud = Vec::with_capacity(window_count as usize);
        for i in 0..window_count {
            // Boundaries are computed in floating point and truncated; the
            // window length itself is never rounded.
            let start = (i as f64 * samples_per_window) as u64;
            let end = (((i + 1) as f64 * samples_per_window) as u64).min(total_frames);

            // The tail window may be empty when the track length is not a
            // multiple of the window length; an empty window is silent.
            let window_peak = audio
                .frame_slice(start, end)
                .iter()
                .map(|s| s.abs())
                .fold(0.0f32, f32::max);

            loud.push(window_peak as f64 / max_volume as f64 >= self.silence_threshold);
        }

        debug!(
            "Loudness analysis: {} of {} windows loud (peak {:.4})",
            loud.iter().filter(|&&l| l).count(),
            window_count,
            max_volume
        );

        Ok(LoudnessProfile {
            loud,
            max_volume,
            samples_per_window,
        })
    }
}

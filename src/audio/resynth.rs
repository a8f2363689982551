use rayon::prelude::*;
use tracing::{debug, info};

use crate::audio::stretch::TimeStretcher;
use crate::audio::types::{AudioData, LoudnessProfile};
use crate::error::Result;
use crate::timeline::{Chunk, SampleSpan, SpeedTable};

/// The rendered output track plus, per chunk, the exact sample range it
/// occupies. The spans are what keep the frame remapper in sync with the
/// audio: output frame indices are derived from them, never recomputed from
/// chunk lengths.
#[derive(Debug, Clone)]
pub struct ResynthOutput {
    /// Complete output PCM buffer
    pub audio: AudioData,

    /// Output sample-frame span occupied by each chunk, in chunk order
    pub spans: Vec<SampleSpan>,
}

/// Renders the output audio track chunk by chunk
///
/// Each chunk's slice is time-stretched at its class speed, normalized by
/// the track peak, faded at both edges and appended to the accumulator.
/// Stretching and fading are independent per chunk, so they run on the
/// rayon pool; the accumulator itself is stitched strictly in chunk order.
pub struct AudioResynthesizer {
    crossfade_samples: usize,
}

impl AudioResynthesizer {
    pub fn new(crossfade_samples: usize) -> Self {
        Self { crossfade_samples }
    }

    /// Render all chunks into a single output buffer
    pub fn resynthesize(
        &self,
        audio: &AudioData,
        profile: &LoudnessProfile,
        chunks: &[Chunk],
        speeds: &SpeedTable,
        stretcher: &dyn TimeStretcher,
    ) -> Result<ResynthOutput> {
        let channels = audio.channels as usize;

        info!(
            "Resynthesizing {} chunks ({} channels, crossfade {} samples)",
            chunks.len(),
            channels,
            self.crossfade_samples
        );

        let rendered: Result<Vec<Vec<f32>>> = chunks
            .par_iter()
            .map(|chunk| self.render_chunk(chunk, audio, profile, speeds, stretcher))
            .collect();
        let rendered = rendered?;

        let total_samples: usize = rendered.iter().map(|r| r.len()).sum();
        let mut samples = Vec::with_capacity(total_samples);
        let mut spans = Vec::with_capacity(chunks.len());

        for buffer in rendered {
            let prior = (samples.len() / channels) as u64;
            samples.extend_from_slice(&buffer);
            let now = (samples.len() / channels) as u64;
            spans.push(SampleSpan::new(prior, now));
        }

        debug!(
            "Rendered {:.1}s of output audio from {:.1}s of input",
            samples.len() as f64 / channels as f64 / audio.sample_rate as f64,
            audio.duration()
        );

        Ok(ResynthOutput {
            audio: AudioData::new(samples, audio.sample_rate, audio.channels),
            spans,
        })
    }

    /// Stretch, normalize and edge-fade a single chunk
    fn render_chunk(
        &self,
        chunk: &Chunk,
        audio: &AudioData,
        profile: &LoudnessProfile,
        speeds: &SpeedTable,
        stretcher: &dyn TimeStretcher,
    ) -> Result<Vec<f32>> {
        let channels = audio.channels as usize;
        let spw = profile.samples_per_window;

        // Chunk boundaries use the same truncated floating-point arithmetic
        // as the analyzer windows, so slices tile the input exactly.
        let start = (chunk.start as f64 * spw) as u64;
        let end = (chunk.end as f64 * spw) as u64;
        let slice = audio.frame_slice(start, end);

        let speed = speeds.speed_for(chunk.class);
        let mut stretched = stretcher.stretch(slice, channels, speed)?;

        // Keep the output in a bounded range regardless of source level
        for sample in stretched.iter_mut() {
            *sample /= profile.max_volume;
        }

        self.apply_fades(&mut stretched, channels);
        Ok(stretched)
    }

    /// Fade a chunk in at its head and out at its tail
    ///
    /// Chunks too short to fade safely are zeroed outright; the adjacent
    /// fades at every chunk boundary are what prevent clicks when the speed
    /// changes.
    fn apply_fades(&self, samples: &mut [f32], channels: usize) {
        let fade = self.crossfade_samples;
        let frames = samples.len() / channels;

        if frames < fade {
            samples.fill(0.0);
            return;
        }

        for i in 0..fade {
            let gain = i as f32 / fade as f32;
            for ch in 0..channels {
                samples[i * channels + ch] *= gain;
            }
        }

        for i in 0..fade {
            let gain = 1.0 - i as f32 / fade as f32;
            let frame = frames - fade + i;
            for ch in 0..channels {
                samples[frame * channels + ch] *= gain;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::SpeedClass;

    /// Test stretcher that decimates by the speed ratio with no windowing,
    /// keeping lengths exact and predictable.
    struct DecimatingStretcher;

    impl TimeStretcher for DecimatingStretcher {
        fn stretch(&self, samples: &[f32], channels: usize, speed: f64) -> Result<Vec<f32>> {
            let frames = samples.len() / channels;
            let out_frames = (frames as f64 / speed).floor() as usize;

            let mut out = Vec::with_capacity(out_frames * channels);
            for f in 0..out_frames {
                let src = ((f as f64 * speed) as usize).min(frames - 1);
                for ch in 0..channels {
                    out.push(samples[src * channels + ch]);
                }
            }
            Ok(out)
        }
    }

    fn profile(loud: Vec<bool>, max_volume: f32, spw: f64) -> LoudnessProfile {
        LoudnessProfile {
            loud,
            max_volume,
            samples_per_window: spw,
        }
    }

    #[test]
    fn test_spans_partition_accumulator() {
        // Three chunks over 30 windows of 10 frames each, mono.
        let audio = AudioData::new(vec![0.5; 300], 100, 1);
        let prof = profile(vec![true; 30], 0.5, 10.0);
        let chunks = vec![
            Chunk::new(0, 10, SpeedClass::Silent),
            Chunk::new(10, 20, SpeedClass::Sounded),
            Chunk::new(20, 30, SpeedClass::Silent),
        ];
        let speeds = SpeedTable::new(2.0, 1.0).unwrap();

        let resynth = AudioResynthesizer::new(4);
        let out = resynth
            .resynthesize(&audio, &prof, &chunks, &speeds, &DecimatingStretcher)
            .unwrap();

        assert_eq!(out.spans.len(), 3);
        assert_eq!(out.spans[0], SampleSpan::new(0, 50));
        assert_eq!(out.spans[1], SampleSpan::new(50, 150));
        assert_eq!(out.spans[2], SampleSpan::new(150, 200));
        assert_eq!(out.audio.frame_count(), 200);

        // No samples dropped or double-counted at chunk boundaries.
        let total: u64 = out.spans.iter().map(|s| s.len()).sum();
        assert_eq!(total, out.audio.frame_count());
    }

    #[test]
    fn test_normalized_by_peak() {
        let audio = AudioData::new(vec![0.25; 100], 100, 1);
        let prof = profile(vec![true; 10], 0.25, 10.0);
        let chunks = vec![Chunk::new(0, 10, SpeedClass::Sounded)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let resynth = AudioResynthesizer::new(4);
        let out = resynth
            .resynthesize(&audio, &prof, &chunks, &speeds, &DecimatingStretcher)
            .unwrap();

        // Interior samples (outside the fades) sit at full scale.
        assert!((out.audio.samples[50] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fade_envelopes() {
        let audio = AudioData::new(vec![0.5; 100], 100, 1);
        let prof = profile(vec![true; 10], 0.5, 10.0);
        let chunks = vec![Chunk::new(0, 10, SpeedClass::Sounded)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let fade = 10;
        let resynth = AudioResynthesizer::new(fade);
        let out = resynth
            .resynthesize(&audio, &prof, &chunks, &speeds, &DecimatingStretcher)
            .unwrap();

        let samples = &out.audio.samples;
        assert_eq!(samples.len(), 100);

        // Head ramps up from zero...
        assert_eq!(samples[0], 0.0);
        assert!((samples[5] - 0.5).abs() < 1e-6);
        // ...interior untouched...
        assert!((samples[50] - 1.0).abs() < 1e-6);
        // ...tail ramps down but never quite reaches zero (the last frame
        // keeps a 1/fade sliver, matching the envelope definition).
        assert!((samples[99] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_short_chunk_is_zeroed() {
        // A one-window silent chunk at speed 5 renders 2 frames, far below
        // the crossfade length, so it is muted entirely.
        let mut samples = vec![0.9; 100];
        samples.extend(vec![0.001; 10]);
        samples.extend(vec![0.9; 100]);
        let audio = AudioData::new(samples, 100, 1);

        let mut loud = vec![true; 10];
        loud.push(false);
        loud.extend(vec![true; 10]);
        let prof = profile(loud, 0.9, 10.0);

        let chunks = vec![
            Chunk::new(0, 10, SpeedClass::Sounded),
            Chunk::new(10, 11, SpeedClass::Silent),
            Chunk::new(11, 21, SpeedClass::Sounded),
        ];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let resynth = AudioResynthesizer::new(4);
        let out = resynth
            .resynthesize(&audio, &prof, &chunks, &speeds, &DecimatingStretcher)
            .unwrap();

        let span = out.spans[1];
        assert_eq!(span.len(), 2);
        let lo = span.start as usize;
        let hi = span.end as usize;
        assert!(out.audio.samples[lo..hi].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_stereo_fades_cover_both_channels() {
        let audio = AudioData::new(vec![0.5; 200], 100, 2);
        let prof = profile(vec![true; 10], 0.5, 10.0);
        let chunks = vec![Chunk::new(0, 10, SpeedClass::Sounded)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let resynth = AudioResynthesizer::new(10);
        let out = resynth
            .resynthesize(&audio, &prof, &chunks, &speeds, &DecimatingStretcher)
            .unwrap();

        // First frame silent on both channels.
        assert_eq!(out.audio.samples[0], 0.0);
        assert_eq!(out.audio.samples[1], 0.0);
        assert_eq!(out.audio.frame_count(), 100);
    }
}

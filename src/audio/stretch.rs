use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;

use crate::error::{AudioError, Result};

/// Time-stretch primitive consumed by the audio resynthesizer
///
/// Given an interleaved PCM slice and a speed ratio, returns a resampled
/// slice of the same channel count at a different sample count. The
/// resynthesizer treats this as a black box; any internal buffering or
/// windowing is the implementation's business.
pub trait TimeStretcher: Send + Sync {
    fn stretch(&self, samples: &[f32], channels: usize, speed: f64) -> Result<Vec<f32>>;
}

/// Phase-vocoder time stretcher
///
/// Classic short-time FFT vocoder: Hann-windowed analysis frames advanced by
/// `speed`-scaled hops, per-bin phase accumulation, and overlap-add
/// resynthesis at the fixed synthesis hop. Pitch is preserved while duration
/// scales by `1/speed`. Slices too short for even one analysis window (or
/// whose stretched result would be shorter than one) fall back to plain
/// linear-interpolation resampling.
pub struct PhaseVocoder {
    window_size: usize,
}

impl PhaseVocoder {
    pub fn new() -> Self {
        Self::with_window_size(1024)
    }

    pub fn with_window_size(window_size: usize) -> Self {
        Self { window_size }
    }

    fn hann(window_size: usize) -> Vec<f32> {
        (0..window_size)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (window_size - 1) as f32).cos())
            })
            .collect()
    }

    /// Wrap a phase difference into (-pi, pi]
    fn wrap_phase(phase: f32) -> f32 {
        use std::f32::consts::PI;
        (phase + PI).rem_euclid(2.0 * PI) - PI
    }

    /// Linear-interpolation resample of one channel
    fn resample_linear(channel: &[f32], speed: f64) -> Vec<f32> {
        let out_len = (channel.len() as f64 / speed).floor() as usize;

        (0..out_len)
            .map(|i| {
                let pos = i as f64 * speed;
                let base = pos.floor() as usize;
                let frac = (pos - base as f64) as f32;
                let a = channel[base.min(channel.len() - 1)];
                let b = channel[(base + 1).min(channel.len() - 1)];
                a + (b - a) * frac
            })
            .collect()
    }

    /// Stretch a single de-interleaved channel
    fn stretch_channel(&self, channel: &[f32], speed: f64) -> Result<Vec<f32>> {
        let win = self.window_size;
        let hop_synthesis = win / 4;
        let hop_analysis = ((hop_synthesis as f64 * speed).round() as usize).max(1);

        let expected_len = channel.len() as f64 / speed;
        if channel.len() < win || expected_len < win as f64 {
            return Ok(Self::resample_linear(channel, speed));
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(win);
        let inverse = planner.plan_fft_inverse(win);

        let mut input_buffer = forward.make_input_vec();
        let mut spectrum = forward.make_output_vec();
        let mut synth_spectrum = inverse.make_input_vec();
        let mut frame_out = inverse.make_output_vec();

        let window = Self::hann(win);
        let bins = win / 2 + 1;

        let frame_count = (channel.len() - win) / hop_analysis + 1;
        let out_len = (frame_count - 1) * hop_synthesis + win;

        let mut output = vec![0.0f32; out_len];
        let mut window_norm = vec![0.0f32; out_len];

        let mut prev_phase = vec![0.0f32; bins];
        let mut phase_acc = vec![0.0f32; bins];

        // Per-bin phase advance expected over one analysis hop
        let expected: Vec<f32> = (0..bins)
            .map(|k| 2.0 * std::f32::consts::PI * hop_analysis as f32 * k as f32 / win as f32)
            .collect();

        for t in 0..frame_count {
            let offset = t * hop_analysis;
            for (i, sample) in input_buffer.iter_mut().enumerate() {
                *sample = channel[offset + i] * window[i];
            }

            forward
                .process(&mut input_buffer, &mut spectrum)
                .map_err(|_| AudioError::StretchFailed {
                    reason: "forward FFT failed".to_string(),
                })?;

            for k in 0..bins {
                let magnitude = spectrum[k].norm();
                let phase = spectrum[k].arg();

                if t == 0 {
                    phase_acc[k] = phase;
                } else {
                    // Deviation from the expected advance gives the true
                    // per-bin frequency; re-advance it at the synthesis hop.
                    let deviation = Self::wrap_phase(phase - prev_phase[k] - expected[k]);
                    let advance = (expected[k] + deviation) * hop_synthesis as f32
                        / hop_analysis as f32;
                    phase_acc[k] = Self::wrap_phase(phase_acc[k] + advance);
                }

                prev_phase[k] = phase;
                synth_spectrum[k] = Complex::from_polar(magnitude, phase_acc[k]);
            }

            // DC and Nyquist bins must stay real for the c2r transform
            synth_spectrum[0].im = 0.0;
            synth_spectrum[bins - 1].im = 0.0;

            inverse
                .process(&mut synth_spectrum, &mut frame_out)
                .map_err(|_| AudioError::StretchFailed {
                    reason: "inverse FFT failed".to_string(),
                })?;

            let out_offset = t * hop_synthesis;
            let scale = 1.0 / win as f32;
            for i in 0..win {
                output[out_offset + i] += frame_out[i] * window[i] * scale;
                window_norm[out_offset + i] += window[i] * window[i];
            }
        }

        for (sample, norm) in output.iter_mut().zip(window_norm.iter()) {
            *sample /= norm.max(1e-8);
        }

        Ok(output)
    }
}

impl Default for PhaseVocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeStretcher for PhaseVocoder {
    fn stretch(&self, samples: &[f32], channels: usize, speed: f64) -> Result<Vec<f32>> {
        if !(speed > 0.0) || !speed.is_finite() {
            return Err(AudioError::InvalidSpeed { speed }.into());
        }

        if channels == 0 || samples.len() % channels != 0 {
            return Err(AudioError::StretchFailed {
                reason: format!(
                    "{} samples do not interleave into {} channels",
                    samples.len(),
                    channels
                ),
            }
            .into());
        }

        if speed == 1.0 {
            return Ok(samples.to_vec());
        }

        // De-interleave, stretch each channel, re-interleave. Every channel
        // sees the same length and speed, so the outputs line up exactly.
        let frame_count = samples.len() / channels;
        let mut stretched = Vec::with_capacity(channels);

        for ch in 0..channels {
            let channel: Vec<f32> = (0..frame_count)
                .map(|f| samples[f * channels + ch])
                .collect();
            stretched.push(self.stretch_channel(&channel, speed)?);
        }

        let out_frames = stretched[0].len();
        let mut output = Vec::with_capacity(out_frames * channels);
        for f in 0..out_frames {
            for channel in &stretched {
                output.push(channel[f]);
            }
        }

        Ok(output)
    }
}

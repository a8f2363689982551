use std::path::Path;

use crate::audio::types::AudioData;
use crate::error::{AudioError, Result};

/// WAV file loader and writer
///
/// The pipeline only ever sees WAV: the extractor always decodes the input's
/// audio stream to a WAV file in the workspace, and the muxer reads the
/// rendered track back from one.
pub struct WavLoader;

impl WavLoader {
    /// Load a WAV file and return raw audio data
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<AudioData> {
        let path = path.as_ref();

        let reader = hound::WavReader::open(path).map_err(|_| AudioError::LoadFailed {
            path: path.display().to_string(),
        })?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;
        let channels = spec.channels;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| AudioError::LoadFailed {
                    path: path.display().to_string(),
                })?,
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                let raw: std::result::Result<Vec<i32>, _> = reader.into_samples().collect();

                raw.map_err(|_| AudioError::LoadFailed {
                    path: path.display().to_string(),
                })?
                .into_iter()
                .map(|sample| Self::int_to_float(sample, bit_depth))
                .collect()
            }
        };

        let mut audio = AudioData::new(samples, sample_rate, channels);
        audio.file_path = Some(path.to_path_buf());
        Ok(audio)
    }

    /// Write audio data as a 32-bit float WAV file
    pub async fn write<P: AsRef<Path>>(path: P, audio: &AudioData) -> Result<()> {
        let path = path.as_ref();

        let spec = hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(|_| {
            AudioError::WriteFailed {
                path: path.display().to_string(),
            }
        })?;

        for &sample in &audio.samples {
            writer.write_sample(sample).map_err(|_| AudioError::WriteFailed {
                path: path.display().to_string(),
            })?;
        }

        writer.finalize().map_err(|_| AudioError::WriteFailed {
            path: path.display().to_string(),
        })?;

        Ok(())
    }

    /// Convert integer sample to float (-1.0 to 1.0)
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            8 => (sample as f32 - 128.0) / 128.0,
            16 => sample as f32 / 32768.0,
            24 => sample as f32 / 8388608.0,
            32 => sample as f32 / 2147483648.0,
            _ => sample as f32 / 32768.0, // Default to 16-bit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_int_to_float_conversion() {
        assert_eq!(WavLoader::int_to_float(0, 16), 0.0);
        assert_eq!(WavLoader::int_to_float(32767, 16), 32767.0 / 32768.0);
        assert_eq!(WavLoader::int_to_float(-32768, 16), -1.0);
        assert_eq!(WavLoader::int_to_float(128, 8), 0.0);
    }

    #[tokio::test]
    async fn test_wav_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");

        let original = AudioData::new(vec![0.0, 0.5, -0.5, 0.25, -0.25, 1.0], 44100, 2);
        WavLoader::write(&path, &original).await.unwrap();

        let loaded = WavLoader::load(&path).await.unwrap();
        assert_eq!(loaded.sample_rate, 44100);
        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.samples, original.samples);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = WavLoader::load("definitely/not/here.wav").await;
        assert!(result.is_err());
    }
}

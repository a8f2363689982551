use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Main configuration for jumpcut
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Audio analysis and resynthesis settings
    pub audio: AudioConfig,

    /// Video retiming settings
    pub video: VideoConfig,

    /// Runtime behaviour
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            video: VideoConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.audio.validate()?;
        self.video.validate()?;
        self.runtime.validate()?;
        Ok(())
    }
}

/// Audio analysis and resynthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Normalized loudness a window must reach to count as "sounded" (0.0-1.0)
    pub silence_threshold: f64,

    /// Playback speed for silent passages (999999 for hard jump cuts)
    pub silent_speed: f64,

    /// Playback speed for sounded passages, typically 1.0
    pub sounded_speed: f64,

    /// Cross-fade length at chunk boundaries, in sample frames
    pub crossfade_samples: usize,

    /// Sample rate the audio track is extracted and rendered at (Hz)
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.03,
            silent_speed: 5.0,
            sounded_speed: 1.0,
            crossfade_samples: 400,
            sample_rate: 44100,
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.silence_threshold) {
            return Err(ConfigError::InvalidValue {
                key: "audio.silence_threshold".to_string(),
                value: self.silence_threshold.to_string(),
            }
            .into());
        }

        if self.silent_speed <= 0.0 || self.sounded_speed <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "audio.speeds".to_string(),
                value: format!("{}/{}", self.silent_speed, self.sounded_speed),
            }
            .into());
        }

        if self.crossfade_samples == 0 {
            return Err(ConfigError::InvalidValue {
                key: "audio.crossfade_samples".to_string(),
                value: self.crossfade_samples.to_string(),
            }
            .into());
        }

        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidValue {
                key: "audio.sample_rate".to_string(),
                value: self.sample_rate.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Video retiming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// How many windows on either side of speech stay at sounded speed
    pub frame_margin: u32,

    /// JPEG quality for extracted frames (1 best - 31 worst, ffmpeg qscale)
    pub frame_quality: u8,

    /// Fallback output frame rate when probing the input fails to supply one
    pub frame_rate: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            frame_margin: 1,
            frame_quality: 3,
            frame_rate: 30.0,
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.frame_quality) {
            return Err(ConfigError::InvalidValue {
                key: "video.frame_quality".to_string(),
                value: self.frame_quality.to_string(),
            }
            .into());
        }

        if self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "video.frame_rate".to_string(),
                value: self.frame_rate.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Runtime behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads for parallel audio resynthesis
    pub worker_threads: usize,

    /// Keep the temporary workspace around after a run (debugging aid)
    pub keep_workspace: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            keep_workspace: false,
        }
    }
}

impl RuntimeConfig {
    fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "runtime.worker_threads".to_string(),
                value: self.worker_threads.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

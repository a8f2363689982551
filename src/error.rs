use thiserror::Error;

/// Main error type for the jumpcut library
#[derive(Error, Debug)]
pub enum JumpcutError {
    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Media tool error: {0}")]
    Media(#[from] MediaError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Audio-specific errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// The whole track is digital silence, so the loudness threshold has
    /// nothing to normalize against.
    #[error("Degenerate input: peak amplitude is zero, cannot normalize loudness")]
    DegenerateInput,

    #[error("Invalid playback speed: {speed} (must be > 0)")]
    InvalidSpeed { speed: f64 },

    #[error("Time-stretch failed: {reason}")]
    StretchFailed { reason: String },

    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to write audio file: {path}")]
    WriteFailed { path: String },

    #[error("Invalid audio parameters: {details}")]
    InvalidParameters { details: String },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    /// The very first frame the remapper asked for is absent, so there is
    /// no earlier frame to fall back on.
    #[error("First requested frame {frame} is missing from the frame store")]
    MissingFirstFrame { frame: u64 },

    #[error("Failed to store output frame {frame}: {reason}")]
    FrameWriteFailed { frame: u64, reason: String },

    #[error("Invalid video parameters: {details}")]
    InvalidParameters { details: String },
}

/// Errors from the external ffmpeg/ffprobe collaborators
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("ffmpeg not found on PATH. Please install FFmpeg.")]
    FfmpegMissing,

    #[error("Failed to probe {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Extraction failed for {path}: {reason}")]
    ExtractFailed { path: String, reason: String },

    #[error("Muxing failed for {path}: {reason}")]
    MuxFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using JumpcutError
pub type Result<T> = std::result::Result<T, JumpcutError>;

impl JumpcutError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Audio(AudioError::DegenerateInput) => {
                "The audio track is completely silent, so there is nothing to retime. \
                 Check that the input file has an audio stream."
                    .to_string()
            }
            Self::Audio(AudioError::LoadFailed { path }) => {
                format!(
                    "Could not load audio file '{}'. Please check the file exists and is a valid WAV.",
                    path
                )
            }
            Self::Media(MediaError::FfmpegMissing) => {
                "ffmpeg was not found. Install it and make sure it is on your PATH.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{MediaError, Result};
use crate::media::workspace::Workspace;

/// ffmpeg wrapper that splits the input into frame images and a WAV track
pub struct MediaExtractor {
    frame_quality: u8,
}

impl MediaExtractor {
    pub fn new(frame_quality: u8) -> Self {
        Self { frame_quality }
    }

    /// Dump every input frame as `frame%06d.jpg` into the workspace
    pub async fn extract_frames<P: AsRef<Path>>(
        &self,
        input: P,
        workspace: &Workspace,
    ) -> Result<()> {
        let input = input.as_ref();
        let pattern = workspace.dir().join("frame%06d.jpg");

        info!("Extracting frames (qscale {})...", self.frame_quality);

        let output = Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .args(["-qscale:v", &self.frame_quality.to_string()])
            .arg(&pattern)
            .arg("-hide_banner")
            .output()
            .map_err(|e| MediaError::ExtractFailed {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MediaError::ExtractFailed {
                path: input.display().to_string(),
                reason: last_stderr_line(&output.stderr),
            }
            .into());
        }

        Ok(())
    }

    /// Decode the input's audio stream to a stereo WAV at the given rate
    pub async fn extract_audio<P: AsRef<Path>>(
        &self,
        input: P,
        sample_rate: u32,
        workspace: &Workspace,
    ) -> Result<()> {
        let input = input.as_ref();
        let wav = workspace.extracted_audio();

        info!("Extracting audio at {} Hz...", sample_rate);

        let output = Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .args(["-ab", "160k", "-ac", "2", "-ar", &sample_rate.to_string(), "-vn"])
            .arg(&wav)
            .arg("-hide_banner")
            .output()
            .map_err(|e| MediaError::ExtractFailed {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MediaError::ExtractFailed {
                path: input.display().to_string(),
                reason: last_stderr_line(&output.stderr),
            }
            .into());
        }

        Ok(())
    }
}

/// Final line of an ffmpeg stderr dump, which is where it puts the reason
pub(crate) fn last_stderr_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("ffmpeg failed with no diagnostic output")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_stderr_line() {
        let stderr = b"frame=  100\nsomething benign\nConversion failed!\n\n";
        assert_eq!(last_stderr_line(stderr), "Conversion failed!");
        assert_eq!(
            last_stderr_line(b""),
            "ffmpeg failed with no diagnostic output"
        );
    }
}

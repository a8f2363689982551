use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{MediaError, Result};
use crate::media::extractor::last_stderr_line;
use crate::media::workspace::Workspace;

/// Combines the remapped frames and the rendered audio into the deliverable
pub struct Muxer {
    frame_rate: f64,
}

impl Muxer {
    pub fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    /// Encode `newframe%06d.jpg` plus the rendered WAV into the output file
    pub async fn mux<P: AsRef<Path>>(&self, workspace: &Workspace, output: P) -> Result<u64> {
        let output = output.as_ref();

        info!("Muxing output at {:.3} fps to {:?}", self.frame_rate, output);

        let result = Command::new("ffmpeg")
            .arg("-y")
            .args(["-framerate", &format!("{}", self.frame_rate)])
            .arg("-i")
            .arg(workspace.output_frame_pattern())
            .arg("-i")
            .arg(workspace.rendered_audio())
            .args(["-strict", "-2"])
            .arg(output)
            .arg("-hide_banner")
            .output()
            .map_err(|e| MediaError::MuxFailed {
                path: output.display().to_string(),
                reason: e.to_string(),
            })?;

        if !result.status.success() {
            return Err(MediaError::MuxFailed {
                path: output.display().to_string(),
                reason: last_stderr_line(&result.stderr),
            }
            .into());
        }

        let file_size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        info!(
            "Output written: {:.1} MB",
            file_size as f64 / 1024.0 / 1024.0
        );

        Ok(file_size)
    }
}

/// Derive the default output path by appending `_ALTERED` before the
/// extension, matching the long-standing convention of this tool
pub fn altered_output_path<P: AsRef<Path>>(input: P) -> std::path::PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_ALTERED.{}", stem, ext),
        None => format!("{}_ALTERED", stem),
    };

    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_altered_output_path() {
        assert_eq!(
            altered_output_path("talk.mp4"),
            PathBuf::from("talk_ALTERED.mp4")
        );
        assert_eq!(
            altered_output_path("/clips/lecture.mkv"),
            PathBuf::from("/clips/lecture_ALTERED.mkv")
        );
        assert_eq!(
            altered_output_path("noext"),
            PathBuf::from("noext_ALTERED")
        );
    }
}

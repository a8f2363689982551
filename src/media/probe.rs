use std::path::Path;
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{MediaError, Result};

/// ffprobe wrapper for the two stream properties the pipeline needs
pub struct MediaProbe;

impl MediaProbe {
    /// Check that ffmpeg is reachable on PATH
    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Average frame rate of the first video stream, as reported by ffprobe
    /// (usually a fraction like `30000/1001`)
    pub fn frame_rate<P: AsRef<Path>>(input: P) -> Result<f64> {
        let input = input.as_ref();
        let raw = Self::probe_entry(input, "v:0", "stream=avg_frame_rate")?;

        let rate = parse_rate(&raw).ok_or_else(|| MediaError::ProbeFailed {
            path: input.display().to_string(),
            reason: format!("unparseable frame rate '{}'", raw.trim()),
        })?;

        info!("Detected frame rate: {:.3} fps", rate);
        Ok(rate)
    }

    /// Sample rate of the first audio stream
    pub fn sample_rate<P: AsRef<Path>>(input: P) -> Result<u32> {
        let input = input.as_ref();
        let raw = Self::probe_entry(input, "a:0", "stream=sample_rate")?;

        let rate = raw.trim().parse().map_err(|_| MediaError::ProbeFailed {
            path: input.display().to_string(),
            reason: format!("unparseable sample rate '{}'", raw.trim()),
        })?;

        info!("Detected sample rate: {} Hz", rate);
        Ok(rate)
    }

    fn probe_entry(input: &Path, stream: &str, entries: &str) -> Result<String> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                stream,
                "-show_entries",
                entries,
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .output()
            .map_err(|e| MediaError::ProbeFailed {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MediaError::ProbeFailed {
                path: input.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse an ffprobe rate, either a plain number or a `num/den` fraction
fn parse_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();

    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }

    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_rate() {
        assert_eq!(parse_rate("30"), Some(30.0));
        assert_eq!(parse_rate(" 25.0 \n"), Some(25.0));
    }

    #[test]
    fn test_parse_fractional_rate() {
        let ntsc = parse_rate("30000/1001").unwrap();
        approx::assert_abs_diff_eq!(ntsc, 29.97, epsilon = 0.01);
        assert_eq!(parse_rate("25/1"), Some(25.0));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("N/A"), None);
        assert_eq!(parse_rate("30/0"), None);
    }
}

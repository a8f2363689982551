use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Process-scoped scratch directory for extracted and rendered media
///
/// Holds the extracted `frame%06d.jpg` files and `audio.wav`, the remapped
/// `newframe%06d.jpg` files and the rendered `audio_new.wav`, everything the
/// external tools produce or consume between input and output.
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    /// Create the default workspace next to the current directory
    pub fn create() -> Result<Self> {
        Self::create_at(format!("./jumpcut_workspace_{}", std::process::id()))
    }

    /// Create a workspace at an explicit location
    pub fn create_at<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("Workspace created at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location the extractor writes the input's audio track to
    pub fn extracted_audio(&self) -> PathBuf {
        self.dir.join("audio.wav")
    }

    /// Location the resynthesizer's output track is written to
    pub fn rendered_audio(&self) -> PathBuf {
        self.dir.join("audio_new.wav")
    }

    /// ffmpeg input pattern for the remapped output frames
    pub fn output_frame_pattern(&self) -> PathBuf {
        self.dir.join("newframe%06d.jpg")
    }

    /// Delete the workspace and everything in it
    pub fn cleanup(self) -> Result<()> {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            warn!("Failed to remove workspace {:?}: {}", self.dir, e);
            return Err(e.into());
        }
        debug!("Workspace {:?} removed", self.dir);
        Ok(())
    }
}

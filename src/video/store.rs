use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, VideoError};

/// Read-only source of extracted input frames, addressed by 1-based index
///
/// Populated externally (the extractor dumps `frame000001.jpg` and up into
/// the workspace) before the remapper runs. A missing index is an ordinary
/// `Ok(None)`; whether that is fatal is the remapper's call.
pub trait FrameStore {
    fn fetch(&self, index: u64) -> Result<Option<Vec<u8>>>;
}

/// Destination for remapped output frames, addressed by 1-based index
pub trait FrameSink {
    fn put(&mut self, index: u64, bytes: &[u8]) -> Result<()>;
}

/// Frame store backed by a directory of `frame%06d.jpg` files
pub struct DirFrameStore {
    dir: PathBuf,
}

impl DirFrameStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame{:06}.jpg", index))
    }
}

impl FrameStore for DirFrameStore {
    fn fetch(&self, index: u64) -> Result<Option<Vec<u8>>> {
        let path = self.frame_path(index);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// Frame sink writing `newframe%06d.jpg` files next to the extracted frames
pub struct DirFrameSink {
    dir: PathBuf,
}

impl DirFrameSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of an output frame, exposed for the muxer's pattern
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("newframe{:06}.jpg", index))
    }
}

impl FrameSink for DirFrameSink {
    fn put(&mut self, index: u64, bytes: &[u8]) -> Result<()> {
        std::fs::write(self.frame_path(index), bytes).map_err(|e| {
            VideoError::FrameWriteFailed {
                frame: index,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// In-memory frame store, mainly for exercising the remapper without a
/// workspace on disk
#[derive(Default)]
pub struct MemoryFrameStore {
    frames: HashMap<u64, Vec<u8>>,
}

impl MemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u64, bytes: Vec<u8>) {
        self.frames.insert(index, bytes);
    }
}

impl FrameStore for MemoryFrameStore {
    fn fetch(&self, index: u64) -> Result<Option<Vec<u8>>> {
        Ok(self.frames.get(&index).cloned())
    }
}

/// In-memory frame sink collecting `(output index, bytes)` pairs in order
#[derive(Default)]
pub struct MemoryFrameSink {
    pub frames: Vec<(u64, Vec<u8>)>,
}

impl MemoryFrameSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for MemoryFrameSink {
    fn put(&mut self, index: u64, bytes: &[u8]) -> Result<()> {
        self.frames.push((index, bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dir_store_roundtrip() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("frame000003.jpg"), b"jpeg bytes").unwrap();

        let store = DirFrameStore::new(dir.path());
        assert_eq!(store.fetch(3).unwrap(), Some(b"jpeg bytes".to_vec()));
        assert_eq!(store.fetch(4).unwrap(), None);
    }

    #[test]
    fn test_dir_sink_writes_pattern() {
        let dir = tempdir().unwrap();
        let mut sink = DirFrameSink::new(dir.path());

        sink.put(12, b"frame").unwrap();
        let written = std::fs::read(dir.path().join("newframe000012.jpg")).unwrap();
        assert_eq!(written, b"frame");
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryFrameStore::new();
        store.insert(1, vec![0xff]);

        assert_eq!(store.fetch(1).unwrap(), Some(vec![0xff]));
        assert_eq!(store.fetch(2).unwrap(), None);
    }
}

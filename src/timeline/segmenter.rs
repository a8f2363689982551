use tracing::debug;

use crate::timeline::types::{Chunk, SpeedClass};

/// Collapses per-window loudness flags into an ordered list of chunks
///
/// A symmetric margin is applied first so speech bleeds into the adjacent
/// silence: a window counts as included if any loud window lies within
/// `margin` windows of it. Without the margin, speed changes would clip
/// speech onsets and offsets.
pub struct ChunkSegmenter {
    margin: usize,
}

impl ChunkSegmenter {
    pub fn new(margin: usize) -> Self {
        Self { margin }
    }

    /// Spread loudness flags by the margin into per-window inclusion flags
    pub fn inclusion_flags(&self, loud: &[bool]) -> Vec<bool> {
        let count = loud.len();

        (0..count)
            .map(|i| {
                let start = i.saturating_sub(self.margin);
                let end = (i + self.margin + 1).min(count);
                loud[start..end].iter().any(|&flag| flag)
            })
            .collect()
    }

    /// Run-length encode the inclusion flags into chunks
    ///
    /// The result partitions `[0, loud.len())` without gaps or overlaps, in
    /// ascending order, and adjacent chunks always carry different classes.
    /// An empty flag list yields an empty chunk list.
    pub fn segment(&self, loud: &[bool]) -> Vec<Chunk> {
        let included = self.inclusion_flags(loud);
        let count = included.len() as u64;

        let mut chunks = Vec::new();
        if count == 0 {
            return chunks;
        }

        let mut run_start = 0u64;
        let mut run_flag = included[0];

        for (i, &flag) in included.iter().enumerate().skip(1) {
            if flag != run_flag {
                chunks.push(Chunk::new(
                    run_start,
                    i as u64,
                    SpeedClass::from_included(run_flag),
                ));
                run_start = i as u64;
                run_flag = flag;
            }
        }

        // The final run closes at the window count with the last window's
        // own flag, which also covers the single-window file.
        chunks.push(Chunk::new(
            run_start,
            count,
            SpeedClass::from_included(run_flag),
        ));

        debug!(
            "Segmented {} windows into {} chunks ({} sounded)",
            count,
            chunks.len(),
            chunks
                .iter()
                .filter(|c| c.class == SpeedClass::Sounded)
                .count()
        );

        chunks
    }
}

use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::timeline::{Chunk, SampleSpan, SpeedTable};
use crate::video::store::{FrameSink, FrameStore};

/// Outcome of a remapping run
#[derive(Debug, Clone)]
pub struct RemapReport {
    /// Resolved input frame index (zero-based) for every output frame, in
    /// output order
    pub mapping: Vec<u64>,

    /// Output frames repaired via the last-good-frame fallback
    pub repaired: u64,
}

impl RemapReport {
    /// Number of output frames produced
    pub fn output_frames(&self) -> u64 {
        self.mapping.len() as u64
    }
}

/// Derives the output frame sequence from the resynthesized audio spans
///
/// For every chunk the audio occupies a known output-sample span; dividing
/// that span by the window length gives the output frames the chunk must
/// fill, and stepping through the source at the chunk's speed gives the
/// input frame for each. A missing input frame is repaired by re-emitting
/// the most recent frame that resolved, so a few dropped frames at the
/// source never break the output. This stage is inherently sequential: the
/// fallback cursor carries state from one frame to the next.
pub struct FrameRemapper {
    samples_per_window: f64,
}

impl FrameRemapper {
    pub fn new(samples_per_window: f64) -> Self {
        Self { samples_per_window }
    }

    /// Copy one input frame into every output slot, chunk by chunk
    pub fn remap(
        &self,
        chunks: &[Chunk],
        spans: &[SampleSpan],
        speeds: &SpeedTable,
        store: &dyn FrameStore,
        sink: &mut dyn FrameSink,
    ) -> Result<RemapReport> {
        if chunks.len() != spans.len() {
            return Err(VideoError::InvalidParameters {
                details: format!(
                    "{} chunks but {} audio spans",
                    chunks.len(),
                    spans.len()
                ),
            }
            .into());
        }

        let spw = self.samples_per_window;
        let mut mapping = Vec::new();
        let mut repaired = 0u64;

        // Most recently resolved frame, kept with its bytes so a fallback
        // never has to re-read the store. Updated only on a successful
        // fetch, read only on a miss.
        let mut last_good: Option<(u64, Vec<u8>)> = None;

        for (chunk, span) in chunks.iter().zip(spans.iter()) {
            let start_frame = (span.start as f64 / spw).ceil() as u64;
            let end_frame = (span.end as f64 / spw).ceil() as u64;
            let speed = speeds.speed_for(chunk.class);

            for out_frame in start_frame..end_frame {
                let input_frame =
                    (chunk.start as f64 + speed * (out_frame - start_frame) as f64) as u64;

                // The store is 1-based on both sides of the pipeline.
                match store.fetch(input_frame + 1)? {
                    Some(bytes) => {
                        sink.put(out_frame + 1, &bytes)?;
                        mapping.push(input_frame);
                        last_good = Some((input_frame, bytes));
                    }
                    None => match last_good {
                        Some((good_frame, ref bytes)) => {
                            warn!(
                                "Input frame {} missing, repeating frame {}",
                                input_frame + 1,
                                good_frame + 1
                            );
                            sink.put(out_frame + 1, bytes)?;
                            mapping.push(good_frame);
                            repaired += 1;
                        }
                        None => {
                            return Err(VideoError::MissingFirstFrame {
                                frame: input_frame + 1,
                            }
                            .into());
                        }
                    },
                }
            }

            debug!(
                "Chunk [{}, {}) -> output frames [{}, {})",
                chunk.start, chunk.end, start_frame, end_frame
            );
        }

        info!(
            "Remapped {} output frames ({} repaired via fallback)",
            mapping.len(),
            repaired
        );

        Ok(RemapReport { mapping, repaired })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JumpcutError;
    use crate::timeline::SpeedClass;
    use crate::video::store::{MemoryFrameSink, MemoryFrameStore};

    fn store_with_frames(count: u64) -> MemoryFrameStore {
        let mut store = MemoryFrameStore::new();
        for i in 1..=count {
            store.insert(i, vec![i as u8]);
        }
        store
    }

    #[test]
    fn test_identity_mapping_at_unit_speed() {
        // One sounded chunk over the whole file at speed 1: every output
        // frame maps straight back to its own input frame.
        let spw = 10.0;
        let chunks = vec![Chunk::new(0, 8, SpeedClass::Sounded)];
        let spans = vec![SampleSpan::new(0, 80)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let store = store_with_frames(8);
        let mut sink = MemoryFrameSink::new();
        let remapper = FrameRemapper::new(spw);

        let report = remapper
            .remap(&chunks, &spans, &speeds, &store, &mut sink)
            .unwrap();

        assert_eq!(report.mapping, (0..8).collect::<Vec<u64>>());
        assert_eq!(report.repaired, 0);
        assert_eq!(sink.frames.len(), 8);
        for (slot, (index, bytes)) in sink.frames.iter().enumerate() {
            assert_eq!(*index, slot as u64 + 1);
            assert_eq!(bytes, &vec![(slot + 1) as u8]);
        }
    }

    #[test]
    fn test_fast_chunk_skips_frames() {
        // Silent chunk of 8 windows at speed 4 renders a quarter of the
        // audio, so only ~len/4 distinct input frames are touched.
        let spw = 10.0;
        let chunks = vec![Chunk::new(0, 8, SpeedClass::Silent)];
        let spans = vec![SampleSpan::new(0, 20)];
        let speeds = SpeedTable::new(4.0, 1.0).unwrap();

        let store = store_with_frames(8);
        let mut sink = MemoryFrameSink::new();
        let remapper = FrameRemapper::new(spw);

        let report = remapper
            .remap(&chunks, &spans, &speeds, &store, &mut sink)
            .unwrap();

        assert_eq!(report.mapping, vec![0, 4]);

        let mut distinct = report.mapping.clone();
        distinct.dedup();
        assert_eq!(distinct.len(), report.mapping.len(), "frames duplicated");
    }

    #[test]
    fn test_miss_repairs_from_last_good_frame() {
        // Store holds frames 1-4 only. The chunk starts at window 2, so the
        // first output frame resolves (store index 3) and later steps land
        // past the end of the store, repeating the last good frame.
        let spw = 10.0;
        let chunks = vec![Chunk::new(2, 8, SpeedClass::Silent)];
        let spans = vec![SampleSpan::new(0, 30)];
        let speeds = SpeedTable::new(2.0, 1.0).unwrap();

        let store = store_with_frames(4);
        let mut sink = MemoryFrameSink::new();
        let remapper = FrameRemapper::new(spw);

        let report = remapper
            .remap(&chunks, &spans, &speeds, &store, &mut sink)
            .unwrap();

        // f0 -> input 2 (hit), f1 -> input 4 (miss), f2 -> input 6 (miss);
        // both misses re-emit frame 2 and leave the cursor untouched.
        assert_eq!(report.mapping, vec![2, 2, 2]);
        assert_eq!(report.repaired, 2);
        for (_, bytes) in &sink.frames {
            assert_eq!(bytes, &vec![3u8]);
        }
    }

    #[test]
    fn test_missing_first_frame_is_fatal() {
        let spw = 10.0;
        let chunks = vec![Chunk::new(0, 4, SpeedClass::Sounded)];
        let spans = vec![SampleSpan::new(0, 40)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();

        let store = MemoryFrameStore::new();
        let mut sink = MemoryFrameSink::new();
        let remapper = FrameRemapper::new(spw);

        let result = remapper.remap(&chunks, &spans, &speeds, &store, &mut sink);
        assert!(matches!(
            result,
            Err(JumpcutError::Video(VideoError::MissingFirstFrame { frame: 1 }))
        ));
    }

    #[test]
    fn test_output_frames_follow_spans() {
        // Two chunks whose spans do not land on window boundaries; the
        // ceiling rule assigns the straddled frame to the earlier chunk.
        let spw = 10.0;
        let chunks = vec![
            Chunk::new(0, 4, SpeedClass::Sounded),
            Chunk::new(4, 8, SpeedClass::Silent),
        ];
        let spans = vec![SampleSpan::new(0, 35), SampleSpan::new(35, 55)];
        let speeds = SpeedTable::new(2.0, 1.0).unwrap();

        let store = store_with_frames(8);
        let mut sink = MemoryFrameSink::new();
        let remapper = FrameRemapper::new(spw);

        let report = remapper
            .remap(&chunks, &spans, &speeds, &store, &mut sink)
            .unwrap();

        // Chunk 1 fills output frames [0, 4), chunk 2 fills [4, 6).
        assert_eq!(report.output_frames(), 6);
        assert_eq!(&report.mapping[..4], &[0, 1, 2, 3]);
        assert_eq!(&report.mapping[4..], &[4, 6]);
    }

    #[test]
    fn test_span_chunk_mismatch_rejected() {
        let remapper = FrameRemapper::new(10.0);
        let chunks = vec![Chunk::new(0, 4, SpeedClass::Sounded)];
        let speeds = SpeedTable::new(5.0, 1.0).unwrap();
        let store = MemoryFrameStore::new();
        let mut sink = MemoryFrameSink::new();

        let result = remapper.remap(&chunks, &[], &speeds, &store, &mut sink);
        assert!(result.is_err());
    }
}

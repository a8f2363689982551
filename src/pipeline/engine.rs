use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    audio::{
        AudioData, AudioResynthesizer, LoudnessAnalyzer, LoudnessProfile, PhaseVocoder,
        ResynthOutput, TimeStretcher, WavLoader,
    },
    config::Config,
    error::{JumpcutError, MediaError, Result},
    media::{altered_output_path, MediaExtractor, MediaProbe, Muxer, Workspace},
    timeline::{Chunk, ChunkSegmenter, SpeedTable},
    video::{DirFrameSink, DirFrameStore, FrameRemapper, FrameSink, FrameStore, RemapReport},
};

/// Everything the pure retiming core produces for one run
#[derive(Debug, Clone)]
pub struct RetimeResult {
    /// Per-window loudness decisions
    pub profile: LoudnessProfile,

    /// Ordered chunk partition of the window space
    pub chunks: Vec<Chunk>,

    /// Rendered output audio plus per-chunk sample spans
    pub output: ResynthOutput,
}

/// Main engine that orchestrates the whole retiming pipeline
///
/// The pipeline runs in five steps:
/// 1. Probe - detect the input's frame rate and audio sample rate
/// 2. Extract - dump frames and the audio track into a workspace
/// 3. Retime - analyze loudness, segment into chunks, resynthesize audio
/// 4. Remap - derive the output frame sequence from the audio spans
/// 5. Mux - assemble the final file and clean up
pub struct JumpcutEngine {
    config: Config,
    stretcher: Box<dyn TimeStretcher>,
}

impl JumpcutEngine {
    /// Create an engine with the stock phase-vocoder stretcher
    pub fn new(config: Config) -> Self {
        Self::with_stretcher(config, Box::new(PhaseVocoder::new()))
    }

    /// Create an engine with a custom time-stretch primitive
    pub fn with_stretcher(config: Config, stretcher: Box<dyn TimeStretcher>) -> Self {
        Self { config, stretcher }
    }

    /// Run the full pipeline on one input file
    ///
    /// When `output` is `None` the result lands next to the input with
    /// `_ALTERED` appended to the name.
    pub async fn process<P: AsRef<Path>>(&self, input: P, output: Option<P>) -> Result<()> {
        let input = input.as_ref();
        let output = output
            .as_ref()
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| altered_output_path(input));

        info!("🎬 Starting jumpcut");
        info!("   Input:  {:?}", input);
        info!("   Output: {:?}", output);

        if !MediaProbe::check_ffmpeg_available() {
            return Err(MediaError::FfmpegMissing.into());
        }

        // Step 1: Probe the input streams
        let frame_rate = match MediaProbe::frame_rate(input) {
            Ok(rate) => rate,
            Err(e) => {
                warn!(
                    "Frame rate probe failed ({}), using configured {} fps",
                    e, self.config.video.frame_rate
                );
                self.config.video.frame_rate
            }
        };
        let sample_rate = match MediaProbe::sample_rate(input) {
            Ok(rate) => rate,
            Err(e) => {
                warn!(
                    "Sample rate probe failed ({}), using configured {} Hz",
                    e, self.config.audio.sample_rate
                );
                self.config.audio.sample_rate
            }
        };

        // Step 2: Extract frames and audio into the workspace
        let workspace = Workspace::create()?;
        let extraction = self.extract(input, sample_rate, &workspace).await;
        let result = match extraction {
            Ok(()) => self.run_core(&workspace, frame_rate, &output).await,
            Err(e) => Err(e),
        };

        if self.config.runtime.keep_workspace {
            info!("Keeping workspace at {:?}", workspace.dir());
        } else {
            workspace.cleanup()?;
        }

        result?;
        info!("🎉 Done! Output saved to {:?}", output);
        Ok(())
    }

    async fn extract(
        &self,
        input: &Path,
        sample_rate: u32,
        workspace: &Workspace,
    ) -> Result<()> {
        info!("📼 Step 2: Extracting frames and audio...");
        let extractor = MediaExtractor::new(self.config.video.frame_quality);
        extractor.extract_frames(input, workspace).await?;
        extractor.extract_audio(input, sample_rate, workspace).await?;
        Ok(())
    }

    /// Steps 3-5: retime the audio, remap the frames, mux the output
    async fn run_core(
        &self,
        workspace: &Workspace,
        frame_rate: f64,
        output: &Path,
    ) -> Result<()> {
        info!("🔊 Step 3: Retiming audio...");
        let audio = WavLoader::load(workspace.extracted_audio()).await?;
        let retimed = self.retime(&audio, frame_rate)?;

        WavLoader::write(workspace.rendered_audio(), &retimed.output.audio).await?;

        info!("🎞️  Step 4: Remapping frames...");
        let store = DirFrameStore::new(workspace.dir());
        let mut sink = DirFrameSink::new(workspace.dir());
        let report = self.remap_frames(&retimed, &store, &mut sink)?;

        info!(
            "   {} output frames, {:.1}s of audio ({} frame repairs)",
            report.output_frames(),
            retimed.output.audio.duration(),
            report.repaired
        );

        info!("📦 Step 5: Muxing output...");
        let muxer = Muxer::new(frame_rate);
        muxer.mux(workspace, output).await?;
        Ok(())
    }

    /// Pure retiming core: loudness analysis, segmentation and resynthesis
    ///
    /// Takes a fully materialized PCM buffer and performs no I/O, so the
    /// whole algorithm can be exercised without ffmpeg or a workspace.
    pub fn retime(&self, audio: &AudioData, frame_rate: f64) -> Result<RetimeResult> {
        let analyzer = LoudnessAnalyzer::new(self.config.audio.silence_threshold, frame_rate);
        let profile = analyzer.analyze(audio)?;

        let segmenter = ChunkSegmenter::new(self.config.video.frame_margin as usize);
        let chunks = segmenter.segment(&profile.loud);

        let speeds = self.speed_table()?;
        let resynth = AudioResynthesizer::new(self.config.audio.crossfade_samples);

        // The per-chunk stretch work is independent, so it runs on a
        // bounded pool; stitching stays in chunk order inside resynthesize.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.runtime.worker_threads)
            .build()
            .map_err(|e| JumpcutError::generic(format!("worker pool: {}", e)))?;

        let output = pool.install(|| {
            resynth.resynthesize(audio, &profile, &chunks, &speeds, self.stretcher.as_ref())
        })?;

        debug!(
            "Retime: {} windows -> {} chunks, {:.1}s -> {:.1}s",
            profile.window_count(),
            chunks.len(),
            audio.duration(),
            output.audio.duration()
        );

        Ok(RetimeResult {
            profile,
            chunks,
            output,
        })
    }

    /// Build the output frame sequence for an already retimed run
    pub fn remap_frames(
        &self,
        retimed: &RetimeResult,
        store: &dyn FrameStore,
        sink: &mut dyn FrameSink,
    ) -> Result<RemapReport> {
        let speeds = self.speed_table()?;
        let remapper = FrameRemapper::new(retimed.profile.samples_per_window);
        remapper.remap(&retimed.chunks, &retimed.output.spans, &speeds, store, sink)
    }

    fn speed_table(&self) -> Result<SpeedTable> {
        SpeedTable::new(
            self.config.audio.silent_speed,
            self.config.audio.sounded_speed,
        )
    }
}

//! The end-to-end extraction pipeline.
//!
//! Orchestrates the stages strictly in sequence — probe-sample, estimate,
//! resample, enhance-and-persist, assemble — because each stage's input is
//! the previous stage's complete output. All working files live under the
//! run's [`RunContext`], so concurrent runs never collide.
//!
//! [`RunContext`]: crate::core::RunContext

mod events;
mod stats;

use std::path::PathBuf;

use tracing::info;

use crate::assemble;
use crate::core::config::PipelineConfig;
use crate::core::errors::{SheetError, SheetResult};
use crate::core::run::RunContext;
use crate::enhance;
use crate::estimator::{self, TextRecognizer};
use crate::sampler::{self, FrameSource, SampleOutcome};

pub use events::{EventSink, PipelineEvent, TracingSink};
pub use stats::RunStats;

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Path of the assembled PDF.
    pub document: PathBuf,
    /// Counters describing the run.
    pub stats: RunStats,
}

/// The two-pass extraction pipeline.
///
/// Built over a [`FrameSource`] (the video), a [`TextRecognizer`] (the OCR
/// engine), a configuration, a run context, and an event sink. `run()`
/// executes the whole pipeline once and reports the output document.
pub struct Pipeline<S, R, E> {
    source: S,
    recognizer: R,
    config: PipelineConfig,
    ctx: RunContext,
    sink: E,
}

impl<S, R, E> Pipeline<S, R, E>
where
    S: FrameSource,
    R: TextRecognizer,
    E: EventSink,
{
    /// Creates a pipeline after validating the configuration.
    pub fn new(
        source: S,
        recognizer: R,
        config: PipelineConfig,
        ctx: RunContext,
        sink: E,
    ) -> SheetResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            recognizer,
            config,
            ctx,
            sink,
        })
    }

    /// The run context this pipeline writes into.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Executes the full pipeline.
    ///
    /// # Errors
    ///
    /// * `SheetError::InvalidVideo` / `SheetError::InvalidInput` when the
    ///   video or parameters are unusable.
    /// * `SheetError::PageCountUndetected` when no probe frame showed a
    ///   readable pagination marker.
    /// * `SheetError::Assembly` when no frame survived to the document.
    /// * Tool, image, and IO errors from the underlying stages.
    ///
    /// Per-frame decode failures are *not* errors: they are emitted as
    /// [`PipelineEvent::FrameSkipped`] and show up as gaps in the document.
    pub fn run(&self) -> SheetResult<RunReport> {
        let mut stats = RunStats::default();
        self.sink.emit(PipelineEvent::RunStarted {
            run_id: self.ctx.run_id().to_string(),
        });

        let metadata = self.source.metadata();
        self.sink.emit(PipelineEvent::VideoProbed {
            duration_secs: metadata.duration_secs,
            fps: metadata.fps,
        });

        // Pass 1: probe a handful of segments to read a pagination marker.
        let probe = self.sample_pass(self.config.probe_page_count, &mut stats)?;
        stats.probe_frames = probe.frames.len();

        let pages = estimator::estimate(&probe.frames, &self.recognizer)?;
        if pages == 0 {
            return Err(SheetError::PageCountUndetected);
        }
        stats.detected_pages = pages;
        self.sink.emit(PipelineEvent::PageCountDetected { pages });
        // Probe frames are discarded here; the final pass resamples at
        // page-aligned midpoints.
        drop(probe);

        // Pass 2: resample with the discovered count, enhance, persist.
        let outcome = self.sample_pass(pages, &mut stats)?;
        stats.final_frames = outcome.frames.len();

        let ext = self.config.frame_format.as_str();
        for mut frame in outcome.frames {
            enhance::enhance_frame(&mut frame, self.config.sharpen_factor);
            let path = self.ctx.frame_path(frame.page_index, ext);
            frame.image.save(&path)?;
            stats.written_frames += 1;
            self.sink.emit(PipelineEvent::FrameWritten {
                page_index: frame.page_index,
                path,
            });
        }

        let document = assemble::assemble(&self.ctx.frames_dir(), ext, &self.ctx.output_path())?;
        self.sink.emit(PipelineEvent::DocumentAssembled {
            path: document.clone(),
            pages: stats.written_frames,
        });

        info!(%stats, "run complete");
        Ok(RunReport { document, stats })
    }

    /// Runs one sampling pass and forwards its outcome as events.
    fn sample_pass(&self, page_count: u32, stats: &mut RunStats) -> SheetResult<SampleOutcome> {
        let outcome = sampler::sample(&self.source, page_count, self.config.intro_length_secs)?;
        for frame in &outcome.frames {
            self.sink.emit(PipelineEvent::FrameSampled {
                page_index: frame.page_index,
                timestamp_secs: frame.timestamp_secs,
            });
        }
        for skip in &outcome.skipped {
            stats.skipped_frames += 1;
            self.sink.emit(PipelineEvent::FrameSkipped {
                page_index: skip.page_index,
                timestamp_secs: skip.timestamp_secs,
                reason: skip.reason.clone(),
            });
        }
        Ok(outcome)
    }
}

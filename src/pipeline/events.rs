//! Structured pipeline events.
//!
//! The algorithmic core never talks to a UI. Instead it emits
//! [`PipelineEvent`] values through an [`EventSink`], and a presentation
//! layer (CLI, web frontend, test harness) subscribes however it likes. The
//! default [`TracingSink`] forwards everything to `tracing`.

use std::path::PathBuf;

use tracing::{info, warn};

/// Status events emitted over the course of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The run started.
    RunStarted {
        /// Unique run identifier.
        run_id: String,
    },
    /// Video metadata was read successfully.
    VideoProbed {
        /// Duration in seconds.
        duration_secs: f64,
        /// Frames per second.
        fps: f64,
    },
    /// A frame was decoded during a sampling pass.
    FrameSampled {
        /// 1-based page index.
        page_index: u32,
        /// Timestamp the frame was decoded at.
        timestamp_secs: f64,
    },
    /// A timestamp failed to decode; the page was skipped.
    FrameSkipped {
        /// 1-based page index that was skipped.
        page_index: u32,
        /// Timestamp that failed.
        timestamp_secs: f64,
        /// Decoder error message.
        reason: String,
    },
    /// The estimator discovered the page count.
    PageCountDetected {
        /// Number of pages the video displays.
        pages: u32,
    },
    /// An enhanced frame was persisted.
    FrameWritten {
        /// 1-based page index.
        page_index: u32,
        /// Where the frame was written.
        path: PathBuf,
    },
    /// The final document was written.
    DocumentAssembled {
        /// Path of the output PDF.
        path: PathBuf,
        /// Number of pages in the document.
        pages: usize,
    },
}

/// A subscriber for pipeline events.
pub trait EventSink {
    /// Receives one event. Implementations must not fail; the pipeline does
    /// not depend on sink responses.
    fn emit(&self, event: PipelineEvent);
}

/// Default sink logging every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { run_id } => info!(%run_id, "run started"),
            PipelineEvent::VideoProbed { duration_secs, fps } => {
                info!(duration_secs, fps, "video probed")
            }
            PipelineEvent::FrameSampled {
                page_index,
                timestamp_secs,
            } => info!(page_index, timestamp_secs, "frame sampled"),
            PipelineEvent::FrameSkipped {
                page_index,
                timestamp_secs,
                reason,
            } => warn!(page_index, timestamp_secs, %reason, "frame skipped"),
            PipelineEvent::PageCountDetected { pages } => info!(pages, "page count detected"),
            PipelineEvent::FrameWritten { page_index, path } => {
                info!(page_index, path = %path.display(), "frame written")
            }
            PipelineEvent::DocumentAssembled { path, pages } => {
                info!(pages, path = %path.display(), "document assembled")
            }
        }
    }
}

//! # sheetscan
//!
//! A Rust library that extracts static sheet-music pages embedded in short
//! tutorial videos and assembles them into a single page-ordered PDF.
//!
//! The hard part of the problem is page-count discovery: the video has an
//! unknown length and displays an unknown number of pages, with no shot
//! boundary information. The pipeline solves it in two passes:
//!
//! 1. **Probe pass** — a small number of frames is sampled at segment
//!    midpoints and run through text recognition, scanning for an on-screen
//!    `current/total` pagination marker (e.g. `2/7`).
//! 2. **Final pass** — sampling is repeated with the discovered page count so
//!    each frame lands in the middle of one page's display interval. Each
//!    frame is sharpened and written to a run-scoped directory, then the
//!    frames are concatenated into a PDF in page order.
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, pipeline configuration, and run context
//! * [`video`] - Video metadata probing, frame seeking, and download
//! * [`sampler`] - Segment-midpoint timestamp math and frame sampling
//! * [`estimator`] - Pagination-marker parsing and page-count estimation
//! * [`enhance`] - Deterministic sharpening applied to each final frame
//! * [`assemble`] - Page-ordered PDF assembly from persisted frames
//! * [`pipeline`] - The end-to-end orchestrator and its event stream
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetscan::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let ctx = RunContext::new(Path::new("work"))?;
//! let source = FfmpegSource::open(Path::new("video.mp4"), &config)?;
//! let recognizer = TesseractRecognizer::from_config(&config);
//!
//! let pipeline = Pipeline::new(source, recognizer, config, ctx, TracingSink)?;
//! let report = pipeline.run()?;
//! println!("wrote {}", report.document.display());
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod core;
pub mod enhance;
pub mod estimator;
pub mod pipeline;
pub mod sampler;
pub mod video;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use sheetscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{PipelineConfig, RunContext, SheetError, SheetResult};
    pub use crate::estimator::{TesseractRecognizer, TextRecognizer};
    pub use crate::pipeline::{EventSink, Pipeline, PipelineEvent, RunReport, TracingSink};
    pub use crate::sampler::{Frame, FrameSource};
    pub use crate::video::FfmpegSource;
}

//! Error types for the extraction pipeline.
//!
//! This module defines the errors that can occur while sampling a video,
//! estimating its page count, and assembling the final document, along with
//! utility constructors for creating them with context.
//!
//! Per-frame failures are deliberately *not* part of this taxonomy: a single
//! timestamp that fails to decode is logged and skipped by the sampler, not
//! propagated. Only run-level failures surface as `SheetError`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type SheetResult<T> = Result<T, SheetError>;

/// Run-level errors that abort the pipeline.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The video is unreadable, empty, or reports a zero frame rate.
    #[error("invalid video: {message}")]
    InvalidVideo {
        /// A message describing why the video was rejected.
        message: String,
    },

    /// An input parameter failed validation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// No pagination marker was recognized in any probe frame, so the page
    /// count could not be discovered. There is no recoverable default.
    #[error(
        "no sheet music pagination detected: no frame showed a readable \
         'current/total' page marker"
    )]
    PageCountUndetected,

    /// The assembler found no qualifying frames to build a document from.
    #[error("assembly failed: {message}")]
    Assembly {
        /// A message describing the assembly failure.
        message: String,
    },

    /// An external tool (ffmpeg, ffprobe, tesseract, yt-dlp) failed.
    #[error("{tool} failed: {context}")]
    Tool {
        /// The external binary that failed.
        tool: String,
        /// What the tool was asked to do, plus any stderr it produced.
        context: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from image encoding or decoding.
    #[error("image codec")]
    Image(#[from] image::ImageError),

    /// Error from PDF serialization.
    #[error("pdf output")]
    Pdf(#[from] printpdf::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// Creates a `SheetError` for an unreadable or malformed video.
    pub fn invalid_video(message: impl Into<String>) -> Self {
        Self::InvalidVideo {
            message: message.into(),
        }
    }

    /// Creates a `SheetError` for invalid input parameters.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `SheetError` for an external tool failure.
    ///
    /// # Arguments
    ///
    /// * `tool` - The name of the binary that failed.
    /// * `context` - What the tool was doing, including captured stderr.
    pub fn tool_failure(tool: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            context: context.into(),
        }
    }

    /// Creates a `SheetError` for an assembly failure.
    pub fn assembly(message: impl Into<String>) -> Self {
        Self::Assembly {
            message: message.into(),
        }
    }

    /// Creates a `SheetError` for a configuration problem.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

//! Frame sources.
//!
//! [`FrameSource`] is the seam between the sampling algorithm and the actual
//! decoder, so tests can drive the sampler with synthetic frames. The
//! production implementation, [`FfmpegSource`], shells out to ffmpeg for one
//! scoped seek-and-decode per timestamp.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbImage;
use tracing::trace;

use crate::core::config::PipelineConfig;
use crate::core::errors::{SheetError, SheetResult};
use crate::video::probe::{probe_video, VideoMetadata};

/// A time-indexed supply of still frames.
pub trait FrameSource {
    /// Metadata of the underlying video.
    fn metadata(&self) -> VideoMetadata;

    /// Decodes one frame at `timestamp_secs`.
    ///
    /// Seeking is best-effort: a failure here is absorbed by the sampler as
    /// a skipped page, not a run-level error.
    fn frame_at(&self, timestamp_secs: f64) -> SheetResult<RgbImage>;
}

/// Frame source backed by an ffmpeg subprocess per seek.
///
/// Opening validates the file up front (positive duration, positive frame
/// rate). Each `frame_at` call spawns `ffmpeg -ss <ts> -i <file> -frames:v 1`
/// and decodes the single PNG it pipes back, so decoder resources are
/// released when the call returns no matter how it terminates.
#[derive(Debug)]
pub struct FfmpegSource {
    path: PathBuf,
    ffmpeg_bin: String,
    metadata: VideoMetadata,
}

impl FfmpegSource {
    /// Opens a video file and probes its metadata.
    ///
    /// # Errors
    ///
    /// * `SheetError::InvalidVideo` for an unreadable file, a missing video
    ///   stream, or a zero frame rate.
    /// * `SheetError::Tool` if ffprobe itself fails.
    pub fn open(path: &Path, config: &PipelineConfig) -> SheetResult<Self> {
        let metadata = probe_video(path, &config.ffprobe_bin)?;
        Ok(Self {
            path: path.to_path_buf(),
            ffmpeg_bin: config.ffmpeg_bin.clone(),
            metadata,
        })
    }

    /// The video file this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FfmpegSource {
    fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    fn frame_at(&self, timestamp_secs: f64) -> SheetResult<RgbImage> {
        trace!(timestamp_secs, "seeking frame");
        let output = Command::new(&self.ffmpeg_bin)
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-ss")
            .arg(format!("{timestamp_secs:.3}"))
            .arg("-i")
            .arg(&self.path)
            .arg("-frames:v")
            .arg("1")
            .arg("-f")
            .arg("image2pipe")
            .arg("-vcodec")
            .arg("png")
            .arg("-")
            .output()
            .map_err(|e| {
                SheetError::tool_failure(&self.ffmpeg_bin, format!("failed to spawn: {e}"))
            })?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(SheetError::tool_failure(
                &self.ffmpeg_bin,
                format!(
                    "no frame decoded at {:.3}s: {}",
                    timestamp_secs,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let image = image::load_from_memory(&output.stdout)?;
        Ok(image.to_rgb8())
    }
}

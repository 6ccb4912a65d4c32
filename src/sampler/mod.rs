//! Frame sampling at segment midpoints.
//!
//! The sampler assumes each sheet-music page is displayed for one contiguous
//! span of the video after an intro window. It divides the usable duration
//! into one segment per expected page and samples the **midpoint** of each
//! segment, the point least likely to straddle a page transition or
//! animation.
//!
//! Seeking is best-effort: a timestamp that fails to decode is recorded as a
//! skipped page and the pass continues, so a single bad seek shows up as a
//! gap in the final document instead of aborting the run.

use image::RgbImage;
use tracing::warn;

use crate::core::errors::{SheetError, SheetResult};
pub use crate::video::source::FrameSource;

/// Whether a frame still carries raw decoder output or has been sharpened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enhancement {
    /// Pixels as decoded from the video.
    Raw,
    /// Pixels after the sharpening pass.
    Enhanced,
}

/// One frame captured for one page.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 1-based page index this frame represents.
    pub page_index: u32,
    /// Video timestamp the frame was decoded at, in seconds.
    pub timestamp_secs: f64,
    /// Pixel data.
    pub image: RgbImage,
    /// Enhancement state.
    pub enhancement: Enhancement,
}

/// A page index whose timestamp failed to decode during a sampling pass.
#[derive(Debug, Clone)]
pub struct SkippedSample {
    /// 1-based page index that was skipped.
    pub page_index: u32,
    /// Timestamp that failed to decode.
    pub timestamp_secs: f64,
    /// Human-readable reason, taken from the decoder error.
    pub reason: String,
}

/// Result of one sampling pass: decoded frames in increasing page-index
/// order, plus the pages that had to be skipped.
#[derive(Debug)]
pub struct SampleOutcome {
    /// Successfully decoded frames.
    pub frames: Vec<Frame>,
    /// Pages whose timestamp failed to decode.
    pub skipped: Vec<SkippedSample>,
}

/// Computes the sample timestamp for each of `page_count` equal segments of
/// the video after the intro window.
///
/// For segment `i` (0-indexed) the timestamp is
/// `intro + i * segment + segment / 2`, the segment midpoint.
///
/// # Errors
///
/// * `SheetError::InvalidInput` if `page_count` is zero or the intro window
///   does not leave any usable duration (`intro >= duration`).
pub fn segment_midpoints(
    duration_secs: f64,
    page_count: u32,
    intro_length_secs: f64,
) -> SheetResult<Vec<f64>> {
    if page_count == 0 {
        return Err(SheetError::invalid_input("page count must be at least 1"));
    }
    if intro_length_secs >= duration_secs {
        return Err(SheetError::invalid_input(format!(
            "intro length {intro_length_secs}s must be shorter than the video ({duration_secs}s)"
        )));
    }

    let segment = (duration_secs - intro_length_secs) / page_count as f64;
    Ok((0..page_count)
        .map(|i| intro_length_secs + segment * i as f64 + segment / 2.0)
        .collect())
}

/// Samples one frame per expected page from `source`.
///
/// # Arguments
///
/// * `source` - The video to decode frames from.
/// * `page_count` - Number of pages assumed to be displayed (the guess for
///   the probe pass, the discovered count for the final pass).
/// * `intro_length_secs` - Intro window to skip before the first segment.
///
/// # Returns
///
/// A [`SampleOutcome`] with at most `page_count` frames, tagged with
/// distinct 1-based page indices in increasing order.
pub fn sample<S: FrameSource>(
    source: &S,
    page_count: u32,
    intro_length_secs: f64,
) -> SheetResult<SampleOutcome> {
    let metadata = source.metadata();
    if metadata.fps <= 0.0 || metadata.duration_secs <= 0.0 {
        return Err(SheetError::invalid_video(format!(
            "cannot sample a video with fps {} and duration {}s",
            metadata.fps, metadata.duration_secs
        )));
    }
    let timestamps = segment_midpoints(metadata.duration_secs, page_count, intro_length_secs)?;

    let mut frames = Vec::with_capacity(timestamps.len());
    let mut skipped = Vec::new();

    for (i, &timestamp_secs) in timestamps.iter().enumerate() {
        let page_index = i as u32 + 1;
        match source.frame_at(timestamp_secs) {
            Ok(image) => frames.push(Frame {
                page_index,
                timestamp_secs,
                image,
                enhancement: Enhancement::Raw,
            }),
            Err(e) => {
                warn!(
                    page_index,
                    timestamp_secs,
                    error = %e,
                    "failed to extract frame, skipping page"
                );
                skipped.push(SkippedSample {
                    page_index,
                    timestamp_secs,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(SampleOutcome { frames, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::probe::VideoMetadata;

    /// Synthetic source producing flat-colored frames, optionally failing at
    /// chosen timestamps.
    struct FakeSource {
        metadata: VideoMetadata,
        fail_at: Vec<f64>,
    }

    impl FakeSource {
        fn with_duration(duration_secs: f64) -> Self {
            Self {
                metadata: VideoMetadata {
                    duration_secs,
                    fps: 30.0,
                },
                fail_at: Vec::new(),
            }
        }
    }

    impl FrameSource for FakeSource {
        fn metadata(&self) -> VideoMetadata {
            self.metadata
        }

        fn frame_at(&self, timestamp_secs: f64) -> SheetResult<RgbImage> {
            if self.fail_at.iter().any(|&t| (t - timestamp_secs).abs() < 1e-9) {
                return Err(SheetError::tool_failure("ffmpeg", "simulated decode failure"));
            }
            Ok(RgbImage::new(4, 4))
        }
    }

    #[test]
    fn midpoints_match_the_segment_formula() {
        // 25s video, 5s intro, 4 pages: 5s segments with midpoints at
        // 7.5, 12.5, 17.5, 22.5.
        let ts = segment_midpoints(25.0, 4, 5.0).unwrap();
        assert_eq!(ts, vec![7.5, 12.5, 17.5, 22.5]);
    }

    #[test]
    fn zero_page_count_is_rejected() {
        assert!(matches!(
            segment_midpoints(25.0, 0, 5.0),
            Err(SheetError::InvalidInput { .. })
        ));
    }

    #[test]
    fn intro_longer_than_video_is_rejected() {
        assert!(segment_midpoints(10.0, 3, 10.0).is_err());
        assert!(segment_midpoints(10.0, 3, 12.0).is_err());
    }

    #[test]
    fn sample_tags_pages_in_increasing_order() {
        let source = FakeSource::with_duration(25.0);
        let outcome = sample(&source, 4, 5.0).unwrap();
        assert_eq!(outcome.frames.len(), 4);
        assert!(outcome.skipped.is_empty());
        let indices: Vec<u32> = outcome.frames.iter().map(|f| f.page_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        for frame in &outcome.frames {
            assert_eq!(frame.enhancement, Enhancement::Raw);
        }
    }

    #[test]
    fn failed_seek_skips_the_page_without_aborting() {
        let mut source = FakeSource::with_duration(25.0);
        source.fail_at = vec![12.5];
        let outcome = sample(&source, 4, 5.0).unwrap();
        let indices: Vec<u32> = outcome.frames.iter().map(|f| f.page_index).collect();
        assert_eq!(indices, vec![1, 3, 4]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].page_index, 2);
    }

    #[test]
    fn zero_frame_rate_video_is_rejected() {
        let mut source = FakeSource::with_duration(25.0);
        source.metadata.fps = 0.0;
        assert!(matches!(
            sample(&source, 4, 5.0),
            Err(SheetError::InvalidVideo { .. })
        ));
    }

    #[test]
    fn sample_never_exceeds_the_requested_count() {
        let source = FakeSource::with_duration(30.0);
        for guess in 1..=6 {
            let outcome = sample(&source, guess, 5.0).unwrap();
            assert!(outcome.frames.len() <= guess as usize);
        }
    }
}

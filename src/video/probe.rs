//! Video metadata probing via ffprobe.
//!
//! Reads duration and frame rate from the first video stream of a file using
//! `ffprobe`'s JSON output. The values feed the sampler's segment math and
//! the up-front validation that rejects unreadable or zero-fps inputs.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::core::errors::{SheetError, SheetResult};

/// Duration and frame rate of a video file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    /// Total duration in seconds.
    pub duration_secs: f64,
    /// Average frame rate in frames per second.
    pub fps: f64,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probes `path` with ffprobe and returns its metadata.
///
/// # Errors
///
/// * `SheetError::Tool` if ffprobe cannot be spawned or exits non-zero.
/// * `SheetError::InvalidVideo` if the file has no video stream, no usable
///   duration, or a zero frame rate.
pub fn probe_video(path: &Path, ffprobe_bin: &str) -> SheetResult<VideoMetadata> {
    let output = Command::new(ffprobe_bin)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=avg_frame_rate,duration:format=duration")
        .arg("-of")
        .arg("json")
        .arg(path)
        .output()
        .map_err(|e| {
            SheetError::tool_failure(ffprobe_bin, format!("failed to spawn: {e}"))
        })?;

    if !output.status.success() {
        return Err(SheetError::tool_failure(
            ffprobe_bin,
            format!(
                "probing {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    let parsed: ProbeOutput = serde_json::from_slice(&output.stdout).map_err(|e| {
        SheetError::tool_failure(ffprobe_bin, format!("unparseable JSON output: {e}"))
    })?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| SheetError::invalid_video("no video stream found"))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .unwrap_or(0.0);
    if fps <= 0.0 {
        return Err(SheetError::invalid_video(
            "video reports a zero frame rate; ensure the file is a valid video",
        ));
    }

    // Stream-level duration is missing for some containers; fall back to the
    // format-level value.
    let duration_secs = stream
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(|d| d.parse::<f64>().ok())
        })
        .unwrap_or(0.0);
    if duration_secs <= 0.0 {
        return Err(SheetError::invalid_video("video has no positive duration"));
    }

    debug!(
        duration_secs,
        fps,
        path = %path.display(),
        "probed video"
    );

    Ok(VideoMetadata { duration_secs, fps })
}

/// Parses an ffprobe rational such as `"30000/1001"` (or a plain `"25"`)
/// into frames per second. Returns `None` for malformed or zero-denominator
/// values.
fn parse_rational(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => value.trim().parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ntsc_rational() {
        let fps = parse_rational("30000/1001").unwrap();
        assert!((fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn parses_plain_number() {
        assert_eq!(parse_rational("25"), Some(25.0));
    }

    #[test]
    fn rejects_zero_denominator() {
        assert_eq!(parse_rational("0/0"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_rational("n/a"), None);
        assert_eq!(parse_rational(""), None);
    }
}

//! Page-count estimation from recognized on-screen text.
//!
//! Sheet-music tutorial videos commonly overlay a `current/total` pagination
//! marker (e.g. `2/7`). The estimator runs text recognition over the probe
//! frames and scans every recognized line for such a marker; the maximum
//! total seen across all frames wins, because any single frame showing
//! `3/7` is authoritative for the true total.
//!
//! OCR output is expected to be noisy. Lines that do not parse are skipped
//! silently; the estimator never fails on garbage text, it only reports 0
//! when nothing parsed, and the pipeline escalates that to a hard error.

mod tesseract;

use image::imageops;
use tracing::{debug, warn};

use crate::core::errors::SheetResult;
use crate::sampler::Frame;
pub use tesseract::TesseractRecognizer;

/// A text recognition engine.
///
/// Implementations return recognized text as an unordered sequence of lines
/// with no accuracy guarantee; callers must tolerate garbage.
pub trait TextRecognizer {
    /// Recognizes text in a grayscale image.
    fn recognize(&self, image: &image::GrayImage) -> SheetResult<Vec<String>>;
}

/// Parses one recognized line as a `current/total` pagination marker and
/// returns the total.
///
/// Acceptance grammar, applied to the trimmed line:
///
/// * the line contains exactly one `/`;
/// * the text right of the `/`, trimmed, parses as an integer ≥ 1.
///
/// The left-hand side is deliberately not required to parse: OCR frequently
/// mangles the current-page digit while the total survives. Anything else
/// (no slash, several slashes, non-numeric or zero total) yields `None` —
/// malformed lines are expected noise, not errors.
pub fn parse_page_marker(line: &str) -> Option<u32> {
    let line = line.trim();
    if line.matches('/').count() != 1 {
        return None;
    }
    let (_, total) = line.split_once('/')?;
    match total.trim().parse::<u32>() {
        Ok(total) if total >= 1 => Some(total),
        _ => None,
    }
}

/// Folds recognized lines into the maximum pagination total, or 0 when no
/// line carries a parseable marker. Insensitive to line order.
pub fn max_total<I, S>(lines: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_page_marker(line.as_ref()))
        .max()
        .unwrap_or(0)
}

/// Estimates the page count from a set of probe frames.
///
/// Each frame is converted to grayscale and run through `recognizer`; the
/// maximum pagination total across all frames and lines is returned. A
/// recognizer failure on a single frame is logged and absorbed — estimation
/// is only as good as the text it can read.
///
/// # Returns
///
/// The discovered page count, or 0 if no frame yielded a parseable marker.
/// The caller decides whether 0 is fatal (the pipeline treats it as such).
pub fn estimate<R: TextRecognizer>(frames: &[Frame], recognizer: &R) -> SheetResult<u32> {
    let mut best = 0u32;

    for frame in frames {
        let gray = imageops::grayscale(&frame.image);
        let lines = match recognizer.recognize(&gray) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(
                    page_index = frame.page_index,
                    error = %e,
                    "text recognition failed for probe frame"
                );
                continue;
            }
        };

        for line in &lines {
            if let Some(total) = parse_page_marker(line) {
                debug!(
                    page_index = frame.page_index,
                    line = line.as_str(),
                    total,
                    "pagination marker candidate"
                );
                best = best.max(total);
            }
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SheetError;
    use crate::sampler::Enhancement;
    use image::RgbImage;

    struct ScriptedRecognizer {
        // One entry per frame, consumed by page index order of the calls.
        lines_per_frame: Vec<Vec<String>>,
        calls: std::cell::Cell<usize>,
    }

    impl ScriptedRecognizer {
        fn new(lines_per_frame: Vec<Vec<&str>>) -> Self {
            Self {
                lines_per_frame: lines_per_frame
                    .into_iter()
                    .map(|v| v.into_iter().map(String::from).collect())
                    .collect(),
                calls: std::cell::Cell::new(0),
            }
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&self, _image: &image::GrayImage) -> SheetResult<Vec<String>> {
            let i = self.calls.get();
            self.calls.set(i + 1);
            self.lines_per_frame
                .get(i)
                .cloned()
                .ok_or_else(|| SheetError::tool_failure("tesseract", "no scripted output"))
        }
    }

    fn frame(page_index: u32) -> Frame {
        Frame {
            page_index,
            timestamp_secs: page_index as f64,
            image: RgbImage::new(4, 4),
            enhancement: Enhancement::Raw,
        }
    }

    #[test]
    fn marker_parses_and_returns_the_total() {
        assert_eq!(parse_page_marker("2/7"), Some(7));
        assert_eq!(parse_page_marker("  12 / 34  "), Some(34));
        // OCR often mangles the numerator; only the total must parse.
        assert_eq!(parse_page_marker("l/7"), Some(7));
    }

    #[test]
    fn marker_rejects_noise() {
        assert_eq!(parse_page_marker("hello"), None);
        assert_eq!(parse_page_marker("3-7"), None);
        assert_eq!(parse_page_marker("a/b"), None);
        assert_eq!(parse_page_marker("1/2/3"), None);
        assert_eq!(parse_page_marker("4/0"), None);
        assert_eq!(parse_page_marker(""), None);
    }

    #[test]
    fn max_total_takes_the_maximum_and_ignores_order() {
        assert_eq!(max_total(["1/7", "garbage", "2/7"]), 7);
        assert_eq!(max_total(["2/7", "garbage", "1/7"]), 7);
        assert_eq!(max_total(["2/7", "1/9"]), 9);
    }

    #[test]
    fn max_total_is_zero_without_markers() {
        assert_eq!(max_total(["hello", "3-7", "a/b"]), 0);
        assert_eq!(max_total(Vec::<String>::new()), 0);
    }

    #[test]
    fn estimate_scans_all_frames() {
        let frames = vec![frame(1), frame(2), frame(3)];
        let recognizer = ScriptedRecognizer::new(vec![
            vec!["some title"],
            vec!["1/3", "noise"],
            vec!["2/3"],
        ]);
        assert_eq!(estimate(&frames, &recognizer).unwrap(), 3);
    }

    #[test]
    fn estimate_absorbs_per_frame_recognizer_failures() {
        let frames = vec![frame(1), frame(2)];
        // Only one scripted output: the second call errors and is absorbed.
        let recognizer = ScriptedRecognizer::new(vec![vec!["4/6"]]);
        assert_eq!(estimate(&frames, &recognizer).unwrap(), 6);
    }

    #[test]
    fn estimate_returns_zero_when_nothing_parses() {
        let frames = vec![frame(1)];
        let recognizer = ScriptedRecognizer::new(vec![vec!["no markers here"]]);
        assert_eq!(estimate(&frames, &recognizer).unwrap(), 0);
    }
}

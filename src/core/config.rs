//! Pipeline configuration.
//!
//! All tunable parameters for a run live in [`PipelineConfig`]. The structure
//! is serde-friendly so it can be loaded from JSON, and every field has a
//! default matching the behavior tuned for short sheet-music tutorial videos.

use serde::{Deserialize, Serialize};

use crate::core::errors::{SheetError, SheetResult};

/// Configuration for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seconds of intro to skip before the first page is assumed visible.
    pub intro_length_secs: f64,

    /// Number of segments sampled during the probe pass. The probe pass only
    /// needs to land on enough pages to read one pagination marker, so this
    /// stays small.
    pub probe_page_count: u32,

    /// Sharpening factor applied to every final frame. 1.0 leaves the frame
    /// untouched; 2.0 matches the tuning the pipeline was calibrated with.
    pub sharpen_factor: f32,

    /// File extension used when persisting frames (also the extension the
    /// assembler filters on).
    pub frame_format: String,

    /// Language passed to the text recognizer.
    pub ocr_lang: String,

    /// Page segmentation mode for the recognizer. 6 assumes a single uniform
    /// block of text, which suits sparse on-screen captions.
    pub ocr_psm: u32,

    /// Name of the ffmpeg binary.
    pub ffmpeg_bin: String,

    /// Name of the ffprobe binary.
    pub ffprobe_bin: String,

    /// Name of the tesseract binary.
    pub tesseract_bin: String,

    /// Name of the yt-dlp binary used for video acquisition.
    pub ytdlp_bin: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intro_length_secs: 5.0,
            probe_page_count: 5,
            sharpen_factor: 2.0,
            frame_format: "jpg".to_string(),
            ocr_lang: "eng".to_string(),
            ocr_psm: 6,
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            tesseract_bin: "tesseract".to_string(),
            ytdlp_bin: "yt-dlp".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a `SheetError::Config` describing the
    /// first invalid field.
    pub fn validate(&self) -> SheetResult<()> {
        if self.probe_page_count == 0 {
            return Err(SheetError::config("probe_page_count must be at least 1"));
        }
        if self.intro_length_secs < 0.0 || !self.intro_length_secs.is_finite() {
            return Err(SheetError::config(format!(
                "intro_length_secs must be a non-negative number, got {}",
                self.intro_length_secs
            )));
        }
        if self.sharpen_factor <= 0.0 || !self.sharpen_factor.is_finite() {
            return Err(SheetError::config(format!(
                "sharpen_factor must be positive, got {}",
                self.sharpen_factor
            )));
        }
        if self.frame_format.is_empty() {
            return Err(SheetError::config("frame_format must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_probe_count_is_rejected() {
        let config = PipelineConfig {
            probe_page_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SheetError::Config { .. })
        ));
    }

    #[test]
    fn negative_sharpen_factor_is_rejected() {
        let config = PipelineConfig {
            sharpen_factor: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig {
            intro_length_secs: 7.5,
            probe_page_count: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.intro_length_secs, 7.5);
        assert_eq!(parsed.probe_page_count, 3);
    }
}

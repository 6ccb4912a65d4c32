//! Tesseract-backed text recognition.
//!
//! Requires the `tesseract` binary on PATH (or the path configured in
//! [`PipelineConfig::tesseract_bin`]). Each call writes the grayscale image
//! to a temporary PNG and reads recognized text from tesseract's stdout.
//!
//! [`PipelineConfig::tesseract_bin`]: crate::core::PipelineConfig

use std::process::Command;

use image::GrayImage;
use tracing::trace;

use crate::core::config::PipelineConfig;
use crate::core::errors::{SheetError, SheetResult};
use crate::estimator::TextRecognizer;

/// Text recognizer shelling out to the tesseract binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
    lang: String,
    psm: u32,
}

impl TesseractRecognizer {
    /// Creates a recognizer with an explicit binary, language, and page
    /// segmentation mode.
    pub fn new(binary: impl Into<String>, lang: impl Into<String>, psm: u32) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
            psm,
        }
    }

    /// Creates a recognizer from the pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.tesseract_bin, &config.ocr_lang, config.ocr_psm)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> SheetResult<Vec<String>> {
        // Tesseract reads from a file, so stage the frame in a temp dir that
        // is removed when this call returns.
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("frame.png");
        image.save(&input)?;

        let output = Command::new(&self.binary)
            .arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| {
                SheetError::tool_failure(&self.binary, format!("failed to spawn: {e}"))
            })?;

        if !output.status.success() {
            return Err(SheetError::tool_failure(
                &self.binary,
                format!(
                    "recognition failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        trace!(line_count = lines.len(), "recognized text lines");
        Ok(lines)
    }
}

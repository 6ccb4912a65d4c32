//! Run statistics.

use std::fmt;

/// Counters describing what one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames decoded during the probe pass.
    pub probe_frames: usize,
    /// Page count discovered by the estimator.
    pub detected_pages: u32,
    /// Frames decoded during the final pass.
    pub final_frames: usize,
    /// Page indices skipped across both passes.
    pub skipped_frames: usize,
    /// Frames enhanced and persisted.
    pub written_frames: usize,
}

impl RunStats {
    /// Fraction of final pages that made it into the document, 0.0 to 1.0.
    pub fn coverage(&self) -> f64 {
        if self.detected_pages == 0 {
            0.0
        } else {
            self.written_frames as f64 / self.detected_pages as f64
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run statistics:")?;
        writeln!(f, "  Probe frames: {}", self.probe_frames)?;
        writeln!(f, "  Detected pages: {}", self.detected_pages)?;
        writeln!(f, "  Final frames: {}", self.final_frames)?;
        writeln!(f, "  Skipped: {}", self.skipped_frames)?;
        writeln!(
            f,
            "  Written: {} ({:.0}% coverage)",
            self.written_frames,
            self.coverage() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_handles_zero_pages() {
        assert_eq!(RunStats::default().coverage(), 0.0);
    }

    #[test]
    fn coverage_is_written_over_detected() {
        let stats = RunStats {
            detected_pages: 4,
            written_frames: 3,
            ..Default::default()
        };
        assert_eq!(stats.coverage(), 0.75);
    }
}

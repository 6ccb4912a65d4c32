//! Run-scoped working directories and file naming.
//!
//! Every pipeline invocation gets a [`RunContext`] keyed by a unique run id.
//! All working files (downloaded video, extracted frames, output PDF) live
//! under the run's own directory, so concurrent runs never collide on file
//! names and cleanup is a single directory removal.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Width frames indices are zero-padded to. Keeps `page_` file names
/// lexicographically sortable up to 999 pages, though the assembler sorts
/// numerically and does not rely on it.
const INDEX_WIDTH: usize = 3;

/// Per-run context holding the unique id and working paths for one pipeline
/// invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    root: PathBuf,
}

impl RunContext {
    /// Creates a new run context under `base_dir` and creates its directories.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the working directories cannot be created.
    pub fn new(base_dir: &Path) -> std::io::Result<Self> {
        let run_id = Uuid::new_v4().simple().to_string();
        let root = base_dir.join(format!("run_{run_id}"));
        let ctx = Self { run_id, root };
        std::fs::create_dir_all(ctx.frames_dir())?;
        Ok(ctx)
    }

    /// The unique identifier for this run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The root working directory for this run.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the persisted final frames.
    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    /// Path for the frame persisting page `page_index` (1-based), using a
    /// zero-padded `page_NNN.<ext>` name.
    pub fn frame_path(&self, page_index: u32, ext: &str) -> PathBuf {
        self.frames_dir()
            .join(format!("page_{page_index:0width$}.{ext}", width = INDEX_WIDTH))
    }

    /// Path the downloaded video is stored at.
    pub fn video_path(&self) -> PathBuf {
        self.root.join("video.mp4")
    }

    /// Path the assembled document is written to.
    pub fn output_path(&self) -> PathBuf {
        self.root.join("sheet_music.pdf")
    }

    /// Removes the run's working directory and everything under it.
    pub fn cleanup(&self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_paths_are_zero_padded() {
        let base = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(base.path()).unwrap();
        let name = ctx.frame_path(7, "jpg");
        assert!(name.to_string_lossy().ends_with("page_007.jpg"));
        let name = ctx.frame_path(42, "jpg");
        assert!(name.to_string_lossy().ends_with("page_042.jpg"));
    }

    #[test]
    fn two_runs_never_share_a_directory() {
        let base = tempfile::tempdir().unwrap();
        let a = RunContext::new(base.path()).unwrap();
        let b = RunContext::new(base.path()).unwrap();
        assert_ne!(a.root(), b.root());
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn cleanup_removes_the_run_directory() {
        let base = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(base.path()).unwrap();
        assert!(ctx.frames_dir().exists());
        ctx.cleanup().unwrap();
        assert!(!ctx.root().exists());
    }
}

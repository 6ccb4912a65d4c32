//! Video acquisition via yt-dlp.
//!
//! Downloads a source URL to a local MP4 the rest of the pipeline can seek
//! into. The downloader is a thin wrapper: it either produces a playable
//! file or fails the run with a tool error.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::core::errors::{SheetError, SheetResult};

/// Downloads `url` to `dest` as an MP4 using yt-dlp.
///
/// # Errors
///
/// Returns `SheetError::Tool` if yt-dlp cannot be spawned, exits non-zero,
/// or exits successfully without producing the destination file.
pub fn download_video(url: &str, dest: &Path, ytdlp_bin: &str) -> SheetResult<PathBuf> {
    info!(url, dest = %dest.display(), "downloading video");

    let output = Command::new(ytdlp_bin)
        .arg("-f")
        .arg("best[ext=mp4]")
        .arg("-o")
        .arg(dest)
        .arg(url)
        .output()
        .map_err(|e| SheetError::tool_failure(ytdlp_bin, format!("failed to spawn: {e}")))?;

    if !output.status.success() {
        return Err(SheetError::tool_failure(
            ytdlp_bin,
            format!(
                "downloading {url}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    if !dest.exists() {
        return Err(SheetError::tool_failure(
            ytdlp_bin,
            format!("exited successfully but {} was not created", dest.display()),
        ));
    }

    Ok(dest.to_path_buf())
}

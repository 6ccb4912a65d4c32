//! Video access: metadata probing, frame seeking, and acquisition.
//!
//! Decoding is delegated to external ffmpeg tooling. Each seek runs one
//! scoped subprocess, so no decoder handle outlives the call that needed it.

pub mod download;
pub mod probe;
pub mod source;

pub use download::download_video;
pub use probe::{probe_video, VideoMetadata};
pub use source::FfmpegSource;

//! Media transcoding via FFmpeg.
//!
//! Retrieval pulls the best available source stream; this module turns that
//! source into the artifact the job actually asked for (MP3 at a requested
//! bitrate).

pub mod audio;

use crate::core::config;
use crate::download::quality::AudioQuality;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during transcoding
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("FFmpeg did not finish within {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Abstraction over the transcoding collaborator.
///
/// Production shells out to ffmpeg; tests substitute fakes so job-level
/// flows can run to completion without external binaries.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcodes a retrieved source file to MP3 at the given bitrate tier,
    /// returning the output path.
    async fn to_mp3(&self, source: &Path, quality: AudioQuality) -> ConversionResult<PathBuf>;
}

/// Production transcoder backed by the ffmpeg binary.
#[derive(Default)]
pub struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_mp3(&self, source: &Path, quality: AudioQuality) -> ConversionResult<PathBuf> {
        audio::convert_to_audio(source, quality).await
    }
}

/// Check if ffmpeg is available
pub async fn check_ffmpeg() -> bool {
    tokio::process::Command::new(config::FFMPEG_BIN.as_str())
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

//! Audio transcoding to MP3 at a requested bitrate.

use super::{ConversionError, ConversionResult};
use crate::core::config;
use crate::download::quality::AudioQuality;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Output path for a transcoded source file: `{stem}_audio_{quality}.mp3`
/// next to the input.
pub fn audio_output_path(input: &Path, quality: AudioQuality) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "audio".to_string());
    let file_name = format!("{}_audio_{}.mp3", stem, quality.label());
    input.with_file_name(file_name)
}

/// Transcode a source media file to MP3 at the given bitrate.
///
/// # Arguments
/// * `input_path` - Path to the retrieved source file (any container ffmpeg reads)
/// * `quality` - Target bitrate tier
///
/// # Returns
/// Path to the MP3 file
pub async fn convert_to_audio<P: AsRef<Path>>(input_path: P, quality: AudioQuality) -> ConversionResult<PathBuf> {
    let input = input_path.as_ref();

    if !input.exists() {
        return Err(ConversionError::InputNotFound(input.display().to_string()));
    }

    let output_path = audio_output_path(input, quality);
    let bitrate = format!("{}k", quality.bitrate_kbps());

    let mut cmd = Command::new(config::FFMPEG_BIN.as_str());
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-acodec")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg(&bitrate)
        .arg(&output_path);
    cmd.kill_on_drop(true);

    log::info!("Transcoding {} to MP3 at {}", input.display(), bitrate);

    let output = tokio::time::timeout(config::transcode::ffmpeg_timeout(), cmd.output())
        .await
        .map_err(|_| ConversionError::Timeout(config::transcode::FFMPEG_TIMEOUT_SECS))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::error!("FFmpeg transcoding error: {}", stderr);
        return Err(ConversionError::FfmpegError(stderr.to_string()));
    }

    Ok(output_path)
}

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Cached ffmpeg binary path
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Path to a Netscape-format cookies file for authenticated extraction
/// Read from YTDL_COOKIES_FILE environment variable
/// When set, every extraction attempt passes it to yt-dlp; without it,
/// sign-in-gated media will fail with a block error
pub static YTDL_COOKIES_FILE: Lazy<Option<String>> = Lazy::new(|| env::var("YTDL_COOKIES_FILE").ok());

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable, defaults to "downloads"
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string());
    shellexpand::tilde(&raw).to_string()
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: jobs.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "jobs.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Worker pool configuration
pub mod worker {
    /// Maximum number of jobs retrieving concurrently.
    /// Kept low to avoid tripping source-site rate limiting; each job spawns
    /// an external yt-dlp process, so this also bounds process fan-out.
    pub const MAX_CONCURRENT_JOBS: usize = 4;
}

/// Extraction configuration
pub mod extraction {
    use super::Duration;

    /// Timeout for a single yt-dlp invocation (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 240;

    /// Socket timeout passed to yt-dlp (in seconds)
    pub const SOCKET_TIMEOUT_SECS: u64 = 60;

    /// HTTP chunk size passed to yt-dlp (5 MiB keeps per-request transfers
    /// small enough for constrained deployments)
    pub const HTTP_CHUNK_SIZE: u64 = 5_242_880;

    /// yt-dlp invocation timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }
}

/// Transcoding configuration
pub mod transcode {
    use super::Duration;

    /// Timeout for a single ffmpeg invocation (in seconds)
    pub const FFMPEG_TIMEOUT_SECS: u64 = 600;

    /// ffmpeg invocation timeout duration
    pub fn ffmpeg_timeout() -> Duration {
        Duration::from_secs(FFMPEG_TIMEOUT_SECS)
    }
}

/// Artifact cleanup configuration
pub mod cleanup {
    use super::Duration;

    /// Age after which a downloaded artifact is eligible for deletion (in seconds)
    pub const MAX_FILE_AGE_SECS: u64 = 900; // 15 minutes

    /// Maximum artifact age duration
    pub fn max_file_age() -> Duration {
        Duration::from_secs(MAX_FILE_AGE_SECS)
    }
}

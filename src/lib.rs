//! Tubefetch - media retrieval job core
//!
//! Turns a media page URL plus a quality choice into a finished file on
//! disk, tracked as a job record from submission to terminal state.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, validation, and shared helpers
//! - `download`: extraction strategies, the yt-dlp seam, artifact resolution
//! - `conversion`: FFmpeg transcoding of retrieved sources
//! - `storage`: SQLite-backed job persistence
//! - `job`: the job model and the orchestrator tying everything together

pub mod conversion;
pub mod core;
pub mod download;
pub mod job;
pub mod storage;

// Re-export commonly used types for convenience
pub use crate::core::{AppError, AppResult};
pub use conversion::{FfmpegTranscoder, Transcoder};
pub use download::{MediaExtractor, MediaKind, QualitySpec, StrategyChain, YtDlpExtractor};
pub use job::{DownloadJob, JobStatus, Orchestrator};
pub use storage::{JobStore, SqliteJobStore};

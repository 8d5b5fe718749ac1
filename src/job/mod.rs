//! Job model and orchestration

pub mod orchestrator;

use crate::download::quality::MediaKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

pub use orchestrator::Orchestrator;

/// Lifecycle state of a download job.
///
/// `Pending` is the only non-terminal state; a job transitions out of it
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single download job record.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadJob {
    pub id: i64,
    pub url: String,
    pub media_kind: MediaKind,
    /// Quality label as submitted, e.g. "720p" or "192kbps"
    pub quality: String,
    /// Sanitized media title; None until the probe has run
    pub title: Option<String>,
    pub status: JobStatus,
    /// Human-readable failure description; set only for failed jobs
    pub error_message: Option<String>,
    /// Absolute path of the finished artifact; set only for completed jobs
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    /// When the terminal state was committed; None while pending
    pub completed_at: Option<DateTime<Utc>>,
}

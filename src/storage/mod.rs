//! Job persistence

pub mod db;

use crate::core::error::AppResult;
use crate::download::quality::MediaKind;
use crate::job::DownloadJob;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool, SqliteJobStore};

/// Persistence seam for job records.
///
/// Terminal transitions are first-writer-wins: `complete` and `fail` return
/// `Ok(false)` when the job had already left the pending state, and the
/// stored record is untouched.
pub trait JobStore: Send + Sync {
    /// Inserts a new pending job and returns it with its assigned id.
    fn create(&self, url: &str, media_kind: MediaKind, quality: &str) -> AppResult<DownloadJob>;

    /// Looks up a job by id.
    fn get(&self, id: i64) -> AppResult<Option<DownloadJob>>;

    /// Most recent jobs, newest first.
    fn list_recent(&self, limit: usize) -> AppResult<Vec<DownloadJob>>;

    /// Commits a successful outcome. Returns whether the transition happened.
    fn complete(&self, id: i64, title: &str, file_path: &str) -> AppResult<bool>;

    /// Commits a failure outcome. Returns whether the transition happened.
    fn fail(&self, id: i64, error_message: &str) -> AppResult<bool>;
}

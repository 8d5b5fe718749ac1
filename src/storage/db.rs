//! SQLite-backed job persistence.

use crate::core::error::AppResult;
use crate::download::quality::MediaKind;
use crate::job::{DownloadJob, JobStatus};
use crate::storage::JobStore;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Row};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and ensures the
/// job table exists.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let conn = pool.get()?;
    init_schema(&conn)?;

    Ok(pool)
}

/// Get a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

fn init_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS download_jobs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            url           TEXT NOT NULL,
            media_kind    TEXT NOT NULL,
            quality       TEXT NOT NULL,
            title         TEXT,
            status        TEXT NOT NULL DEFAULT 'pending',
            error_message TEXT,
            file_path     TEXT,
            created_at    TEXT NOT NULL,
            completed_at  TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_download_jobs_created_at
            ON download_jobs (created_at DESC);",
    )
}

/// Job store backed by the `download_jobs` table.
pub struct SqliteJobStore {
    pool: DbPool,
}

impl SqliteJobStore {
    pub fn new(pool: DbPool) -> Self {
        SqliteJobStore { pool }
    }

    /// Opens (or creates) the database at `path` and wraps it in a store.
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(SqliteJobStore { pool: create_pool(path)? })
    }

    fn row_to_job(row: &Row<'_>) -> rusqlite::Result<DownloadJob> {
        let kind_str: String = row.get("media_kind")?;
        let status_str: String = row.get("status")?;
        let created_str: String = row.get("created_at")?;
        let completed_str: Option<String> = row.get("completed_at")?;

        let media_kind = MediaKind::parse(&kind_str).unwrap_or(MediaKind::Video);
        let status = JobStatus::parse(&status_str).unwrap_or(JobStatus::Failed);
        let created_at = DateTime::parse_from_rfc3339(&created_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let completed_at = completed_str
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(DownloadJob {
            id: row.get("id")?,
            url: row.get("url")?,
            media_kind,
            quality: row.get("quality")?,
            title: row.get("title")?,
            status,
            error_message: row.get("error_message")?,
            file_path: row.get("file_path")?,
            created_at,
            completed_at,
        })
    }

    /// Conditional terminal transition. Affects a row only while it is still
    /// pending, so the first writer wins and later attempts are no-ops.
    fn transition(
        &self,
        id: i64,
        status: JobStatus,
        title: Option<&str>,
        error_message: Option<&str>,
        file_path: Option<&str>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute(
            "UPDATE download_jobs
             SET status = ?1,
                 title = COALESCE(?2, title),
                 error_message = ?3,
                 file_path = ?4,
                 completed_at = ?5
             WHERE id = ?6 AND status = 'pending'",
            params![
                status.as_str(),
                title,
                error_message,
                file_path,
                Utc::now().to_rfc3339(),
                id
            ],
        )?;

        if affected == 0 {
            log::warn!("Ignored {} transition for job {} (not pending)", status, id);
        }
        Ok(affected > 0)
    }
}

impl JobStore for SqliteJobStore {
    fn create(&self, url: &str, media_kind: MediaKind, quality: &str) -> AppResult<DownloadJob> {
        let created_at = Utc::now();
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO download_jobs (url, media_kind, quality, status, created_at)
             VALUES (?1, ?2, ?3, 'pending', ?4)",
            params![url, media_kind.as_str(), quality, created_at.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(DownloadJob {
            id,
            url: url.to_string(),
            media_kind,
            quality: quality.to_string(),
            title: None,
            status: JobStatus::Pending,
            error_message: None,
            file_path: None,
            created_at,
            completed_at: None,
        })
    }

    fn get(&self, id: i64) -> AppResult<Option<DownloadJob>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT * FROM download_jobs WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], Self::row_to_job)?;
        match rows.next() {
            Some(job) => Ok(Some(job?)),
            None => Ok(None),
        }
    }

    fn list_recent(&self, limit: usize) -> AppResult<Vec<DownloadJob>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM download_jobs
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::row_to_job)?;

        let mut jobs = Vec::new();
        for job in rows {
            jobs.push(job?);
        }
        Ok(jobs)
    }

    fn complete(&self, id: i64, title: &str, file_path: &str) -> AppResult<bool> {
        self.transition(id, JobStatus::Completed, Some(title), None, Some(file_path))
    }

    fn fail(&self, id: i64, error_message: &str) -> AppResult<bool> {
        self.transition(id, JobStatus::Failed, None, Some(error_message), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, SqliteJobStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.sqlite");
        let store = SqliteJobStore::open(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_and_get() {
        let (_dir, store) = store();
        let job = store.create("https://youtu.be/abc", MediaKind::Video, "720p").unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.id > 0);

        let fetched = store.get(job.id).unwrap().unwrap();
        assert_eq!(fetched.url, "https://youtu.be/abc");
        assert_eq!(fetched.media_kind, MediaKind::Video);
        assert_eq!(fetched.quality, "720p");
        assert_eq!(fetched.status, JobStatus::Pending);
        assert!(fetched.title.is_none());
        assert!(fetched.completed_at.is_none());
    }

    #[test]
    fn test_get_unknown_id() {
        let (_dir, store) = store();
        assert!(store.get(999).unwrap().is_none());
    }

    #[test]
    fn test_complete_transition() {
        let (_dir, store) = store();
        let job = store.create("https://youtu.be/abc", MediaKind::Audio, "192kbps").unwrap();

        assert!(store.complete(job.id, "Track", "/tmp/job/Track.mp3").unwrap());

        let fetched = store.get(job.id).unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Completed);
        assert_eq!(fetched.title.as_deref(), Some("Track"));
        assert_eq!(fetched.file_path.as_deref(), Some("/tmp/job/Track.mp3"));
        assert!(fetched.error_message.is_none());
        assert!(fetched.completed_at.is_some());
    }

    #[test]
    fn test_fail_transition() {
        let (_dir, store) = store();
        let job = store.create("https://youtu.be/abc", MediaKind::Video, "360p").unwrap();

        assert!(store.fail(job.id, "media unavailable").unwrap());

        let fetched = store.get(job.id).unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Failed);
        assert_eq!(fetched.error_message.as_deref(), Some("media unavailable"));
        assert!(fetched.file_path.is_none());
    }

    #[test]
    fn test_terminal_state_is_committed_once() {
        let (_dir, store) = store();
        let job = store.create("https://youtu.be/abc", MediaKind::Video, "720p").unwrap();

        assert!(store.complete(job.id, "First", "/tmp/first.mp4").unwrap());
        // Late failure report loses the race and changes nothing
        assert!(!store.fail(job.id, "too late").unwrap());
        assert!(!store.complete(job.id, "Second", "/tmp/second.mp4").unwrap());

        let fetched = store.get(job.id).unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Completed);
        assert_eq!(fetched.title.as_deref(), Some("First"));
        assert!(fetched.error_message.is_none());
    }

    #[test]
    fn test_list_recent_order_and_limit() {
        let (_dir, store) = store();
        for i in 0..5 {
            store
                .create(&format!("https://youtu.be/v{}", i), MediaKind::Video, "480p")
                .unwrap();
        }

        let recent = store.list_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        // Newest first; identical timestamps fall back to id order
        assert!(recent[0].id > recent[1].id);
        assert!(recent[1].id > recent[2].id);
    }

    #[test]
    fn test_open_is_idempotent_on_existing_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.sqlite");
        let first = SqliteJobStore::open(path.to_str().unwrap()).unwrap();
        let job = first.create("https://youtu.be/abc", MediaKind::Video, "720p").unwrap();
        drop(first);

        let second = SqliteJobStore::open(path.to_str().unwrap()).unwrap();
        assert!(second.get(job.id).unwrap().is_some());
    }
}

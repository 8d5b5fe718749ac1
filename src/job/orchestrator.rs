//! Job orchestration.
//!
//! `submit` validates, records a pending job, and hands the work to a
//! background task; callers observe progress through `status`. Concurrency is
//! bounded by a semaphore so a burst of submissions cannot fan out into an
//! unbounded number of extractor processes.

use crate::conversion::{FfmpegTranscoder, Transcoder};
use crate::core::error::{AppError, AppResult};
use crate::core::validation::is_supported_media_url;
use crate::download::block::humanize_extraction_error;
use crate::download::chain::StrategyChain;
use crate::download::error::DownloadError;
use crate::download::extractor::MediaExtractor;
use crate::download::quality::{MediaKind, QualitySpec};
use crate::job::{DownloadJob, JobStatus};
use crate::storage::JobStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::core::config;

struct Inner {
    store: Arc<dyn JobStore>,
    chain: StrategyChain,
    transcoder: Arc<dyn Transcoder>,
    semaphore: Semaphore,
    downloads_dir: PathBuf,
}

/// Coordinates validation, persistence, and background retrieval.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn JobStore>, extractor: Arc<dyn MediaExtractor>, downloads_dir: PathBuf) -> Self {
        Self::with_transcoder(store, extractor, Arc::new(FfmpegTranscoder), downloads_dir)
    }

    /// Like [`Orchestrator::new`] with an explicit transcoding collaborator.
    pub fn with_transcoder(
        store: Arc<dyn JobStore>,
        extractor: Arc<dyn MediaExtractor>,
        transcoder: Arc<dyn Transcoder>,
        downloads_dir: PathBuf,
    ) -> Self {
        Orchestrator {
            inner: Arc::new(Inner {
                store,
                chain: StrategyChain::new(extractor),
                transcoder,
                semaphore: Semaphore::new(config::worker::MAX_CONCURRENT_JOBS),
                downloads_dir,
            }),
        }
    }

    /// Submits a new job.
    ///
    /// Validation happens before any record exists; a rejected submission
    /// leaves no trace. On success the returned job is already pending and
    /// visible to `status`, and retrieval proceeds in the background.
    pub async fn submit(&self, url: &str, kind_label: &str, quality_label: &str) -> AppResult<DownloadJob> {
        let url = url.trim();
        if !is_supported_media_url(url) {
            return Err(AppError::Validation(format!("Unsupported media URL: {}", url)));
        }
        let kind = MediaKind::parse(kind_label)
            .ok_or_else(|| AppError::Validation(format!("Unknown media kind: {}", kind_label)))?;
        let spec = QualitySpec::parse(kind, quality_label).ok_or_else(|| {
            AppError::Validation(format!("Unknown {} quality: {}", kind, quality_label))
        })?;

        let job = self.inner.store.create(url, kind, quality_label)?;
        log::info!("Job {} submitted: {} {} {}", job.id, url, kind, quality_label);

        let inner = Arc::clone(&self.inner);
        let spawned_job = job.clone();
        tokio::spawn(async move {
            Self::run(inner, spawned_job, spec).await;
        });

        Ok(job)
    }

    /// Current state of a job.
    pub fn status(&self, id: i64) -> AppResult<DownloadJob> {
        self.inner
            .store
            .get(id)?
            .ok_or_else(|| AppError::NotFound(format!("job {}", id)))
    }

    /// Most recent jobs, newest first.
    pub fn list_recent(&self, limit: usize) -> AppResult<Vec<DownloadJob>> {
        self.inner.store.list_recent(limit)
    }

    /// Path of a completed job's artifact, verified to still exist on disk.
    pub fn artifact_path(&self, id: i64) -> AppResult<PathBuf> {
        let job = self.status(id)?;
        if job.status != JobStatus::Completed {
            return Err(AppError::NotFound(format!("job {} has no artifact (status: {})", id, job.status)));
        }
        let path = job
            .file_path
            .map(PathBuf::from)
            .ok_or_else(|| AppError::NotFound(format!("job {} record has no file path", id)))?;
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "artifact for job {} is gone: {}",
                id,
                path.display()
            )));
        }
        Ok(path)
    }

    /// Background body of one job. Commits exactly one terminal state.
    async fn run(inner: Arc<Inner>, job: DownloadJob, spec: QualitySpec) {
        // Permit is taken here, not in submit, so submission latency stays
        // independent of queue depth
        let _permit = match inner.semaphore.acquire().await {
            Ok(p) => p,
            Err(_) => return, // semaphore closed, shutting down
        };

        match Self::execute(&inner, &job, spec).await {
            Ok((title, artifact)) => {
                log::info!("Job {} completed: {}", job.id, artifact.display());
                let committed = inner
                    .store
                    .complete(job.id, &title, &artifact.to_string_lossy())
                    .unwrap_or_else(|e| {
                        log::error!("Failed to commit completion of job {}: {}", job.id, e);
                        false
                    });
                if !committed {
                    log::warn!("Job {} was already terminal, completion dropped", job.id);
                }
            }
            Err(err) => {
                let message = Self::failure_message(&err);
                log::error!("Job {} failed ({}): {}", job.id, err.subcategory(), message);
                if let Err(e) = inner.store.fail(job.id, &message) {
                    log::error!("Failed to commit failure of job {}: {}", job.id, e);
                }
            }
        }
    }

    async fn execute(inner: &Inner, job: &DownloadJob, spec: QualitySpec) -> Result<(String, PathBuf), DownloadError> {
        // Each job gets its own directory, so equal titles never collide
        let job_dir = inner.downloads_dir.join(format!("job-{}", job.id));
        std::fs::create_dir_all(&job_dir)
            .map_err(|e| DownloadError::Other(format!("Cannot create {}: {}", job_dir.display(), e)))?;

        let retrieved = inner.chain.retrieve(&job.url, spec, &job_dir).await?;

        let artifact = match spec {
            QualitySpec::Audio(quality) => {
                let mp3 = inner
                    .transcoder
                    .to_mp3(&retrieved.path, quality)
                    .await
                    .map_err(|e| DownloadError::Ffmpeg(e.to_string()))?;
                if let Err(e) = std::fs::remove_file(&retrieved.path) {
                    log::warn!("Could not remove source {}: {}", retrieved.path.display(), e);
                }
                mp3
            }
            QualitySpec::Video(_) => retrieved.path,
        };

        Ok((retrieved.title, artifact))
    }

    fn failure_message(err: &DownloadError) -> String {
        match err {
            DownloadError::Extractor(stderr) => humanize_extraction_error(stderr),
            other => other.to_string(),
        }
    }
}

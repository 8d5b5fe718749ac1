//! The extractor seam.
//!
//! `MediaExtractor` is the boundary between orchestration logic and the
//! external yt-dlp process. Production uses [`crate::download::ytdlp::YtDlpExtractor`];
//! tests substitute fakes so the strategy chain and orchestrator can be
//! exercised without network or binaries.

use crate::download::error::DownloadError;
use crate::download::strategy::ExtractorOptions;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// Raw metadata as reported by the extractor. Every field is optional; the
/// strategy chain fills in presentation defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProbe {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<i64>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    pub webpage_url: Option<String>,
}

/// Everything needed for a single retrieval attempt.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub options: ExtractorOptions,
    /// yt-dlp format selector string
    pub format_selector: String,
    /// Output template, e.g. `downloads/job-3/Title.%(ext)s`
    pub output_template: PathBuf,
}

/// Abstraction over the external media extractor.
///
/// Implementations run one extraction attempt with one fixed option set;
/// retry and fallback across option sets belongs to the strategy chain.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetches metadata for a URL without downloading media.
    async fn probe(&self, url: &str, options: &ExtractorOptions) -> Result<RawProbe, DownloadError>;

    /// Downloads media to the request's output template. On success the
    /// artifact exists on disk under the template's directory; locating the
    /// exact file (the extractor picks the extension) is the caller's job.
    async fn fetch(&self, request: &FetchRequest) -> Result<(), DownloadError>;
}

//! Strategy chain: ordered fallback across extraction variants.
//!
//! One chain instance wraps one [`MediaExtractor`] and walks the variant
//! lists from [`crate::download::strategy`]. A variant failure is logged and
//! the next variant is tried; only when every variant has failed does the
//! chain return the last error.

use crate::core::validation::sanitize_title;
use crate::download::error::DownloadError;
use crate::download::extractor::{FetchRequest, MediaExtractor, RawProbe};
use crate::download::quality::{MediaKind, QualitySpec, VideoQuality};
use crate::download::resolver::resolve_artifact;
use crate::download::strategy::{DOWNLOAD_VARIANTS, PROBE_VARIANTS};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Description text longer than this is cut for display.
const DESCRIPTION_LIMIT: usize = 200;

/// Presentation-ready metadata with all gaps filled.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub title: String,
    pub uploader: String,
    pub duration_secs: i64,
    pub view_count: i64,
    pub description: String,
    pub upload_date: String,
    pub thumbnail: String,
    pub webpage_url: String,
}

impl MediaInfo {
    /// Applies display defaults to a raw probe. Missing text fields become
    /// `"Unknown"` or empty, missing numerics become 0, and the page URL
    /// falls back to the URL that was probed.
    fn from_probe(probe: RawProbe, requested_url: &str) -> Self {
        let description = match probe.description {
            Some(d) if d.chars().count() > DESCRIPTION_LIMIT => {
                let cut: String = d.chars().take(DESCRIPTION_LIMIT).collect();
                format!("{}...", cut)
            }
            Some(d) => d,
            None => String::new(),
        };

        MediaInfo {
            title: probe.title.unwrap_or_else(|| "Unknown".to_string()),
            uploader: probe.uploader.unwrap_or_else(|| "Unknown".to_string()),
            duration_secs: probe.duration.map(|d| d as i64).unwrap_or(0),
            view_count: probe.view_count.unwrap_or(0),
            description,
            upload_date: probe.upload_date.unwrap_or_default(),
            thumbnail: probe.thumbnail.unwrap_or_default(),
            webpage_url: probe.webpage_url.unwrap_or_else(|| requested_url.to_string()),
        }
    }
}

/// Outcome of a successful retrieval.
#[derive(Debug, Clone)]
pub struct RetrievedMedia {
    pub info: MediaInfo,
    /// Filesystem-safe title the artifact is named after
    pub title: String,
    pub path: PathBuf,
    pub quality: &'static str,
}

/// Walks extraction variants until one succeeds.
pub struct StrategyChain {
    extractor: Arc<dyn MediaExtractor>,
}

impl StrategyChain {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        StrategyChain { extractor }
    }

    /// Probes metadata, trying each probe variant in order.
    pub async fn probe(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let mut last_error: Option<DownloadError> = None;

        for (i, variant) in PROBE_VARIANTS.iter().enumerate() {
            log::info!("Probe attempt {} ({}) for {}", i + 1, variant.name, url);
            match self.extractor.probe(url, &variant.merged()).await {
                Ok(probe) => {
                    log::info!("Probe succeeded with variant '{}'", variant.name);
                    return Ok(MediaInfo::from_probe(probe, url));
                }
                Err(e) => {
                    log::warn!("Probe variant '{}' failed: {}", variant.name, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DownloadError::Other("no probe variants configured".to_string())))
    }

    /// Retrieves the artifact for one job into `dest_dir`.
    ///
    /// Probes first (the title names the artifact), then tries each download
    /// variant in order. The returned path is the file that actually landed
    /// on disk. For audio jobs this is the raw source stream; transcoding to
    /// MP3 happens downstream.
    pub async fn retrieve(
        &self,
        url: &str,
        spec: QualitySpec,
        dest_dir: &Path,
    ) -> Result<RetrievedMedia, DownloadError> {
        let info = self.probe(url).await?;
        let title = sanitize_title(&info.title);

        if spec == QualitySpec::Video(VideoQuality::ThreeGp) {
            let path = self.retrieve_3gp(url, &title, dest_dir).await?;
            return Ok(RetrievedMedia {
                info,
                title,
                path,
                quality: spec.label(),
            });
        }

        let stem = format!("{}_{}", title, spec.label());
        let template = dest_dir.join(format!("{}.%(ext)s", stem));
        let kind = spec.kind();

        let mut last_error: Option<DownloadError> = None;
        for (i, variant) in DOWNLOAD_VARIANTS.iter().enumerate() {
            log::info!("Retrieval attempt {} ({}) for {}", i + 1, variant.name, url);
            let request = FetchRequest {
                url: url.to_string(),
                options: variant.merged(),
                format_selector: spec.format_selector().to_string(),
                output_template: template.clone(),
            };
            match self.extractor.fetch(&request).await {
                Ok(()) => match resolve_artifact(dest_dir, &stem, kind) {
                    Some(path) => {
                        log::info!("Retrieved {} with variant '{}'", path.display(), variant.name);
                        return Ok(RetrievedMedia {
                            info,
                            title,
                            path,
                            quality: spec.label(),
                        });
                    }
                    None => {
                        let msg = format!("Extractor reported success but no file matches '{}'", stem);
                        log::warn!("{}", msg);
                        last_error = Some(DownloadError::FileNotFound(msg));
                    }
                },
                Err(e) => {
                    log::warn!("Retrieval variant '{}' failed: {}", variant.name, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DownloadError::Other("no download variants configured".to_string())))
    }

    /// Legacy low-bandwidth tier. Single attempt into a temp-prefixed
    /// template, then a rename that marks the tier in the filename.
    ///
    /// TODO: route this through a conversion::video transcode so the payload
    /// is really a 240p 3GP container; the rename only relabels the source.
    async fn retrieve_3gp(&self, url: &str, title: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
        let temp_stem = format!("temp_{}", title);
        let template = dest_dir.join(format!("{}.%(ext)s", temp_stem));

        let request = FetchRequest {
            url: url.to_string(),
            options: DOWNLOAD_VARIANTS[0].merged(),
            format_selector: VideoQuality::ThreeGp.format_selector().to_string(),
            output_template: template,
        };
        self.extractor.fetch(&request).await?;

        let source = resolve_artifact(dest_dir, &temp_stem, MediaKind::Video).ok_or_else(|| {
            DownloadError::FileNotFound(format!("No file matches '{}' after retrieval", temp_stem))
        })?;

        let target = dest_dir.join(format!("{}_3gp.mp4", title));
        std::fs::rename(&source, &target)
            .map_err(|e| DownloadError::Other(format!("Failed to move {}: {}", source.display(), e)))?;

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::quality::AudioQuality;
    use crate::download::strategy::ExtractorOptions;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test double that fails a configurable number of attempts before
    /// succeeding, and records every option set it saw.
    struct FakeExtractor {
        probe_failures: usize,
        fetch_failures: usize,
        probe_calls: Mutex<Vec<String>>,
        fetch_calls: Mutex<Vec<String>>,
        probe_result: RawProbe,
        /// Extension used for files written by fetch
        fetch_ext: &'static str,
    }

    impl FakeExtractor {
        fn new(probe_failures: usize, fetch_failures: usize) -> Self {
            FakeExtractor {
                probe_failures,
                fetch_failures,
                probe_calls: Mutex::new(Vec::new()),
                fetch_calls: Mutex::new(Vec::new()),
                probe_result: RawProbe {
                    title: Some("A Title".to_string()),
                    uploader: Some("Someone".to_string()),
                    duration: Some(123.7),
                    view_count: Some(42),
                    description: Some("short".to_string()),
                    upload_date: Some("20240110".to_string()),
                    thumbnail: None,
                    webpage_url: Some("https://example.test/page".to_string()),
                },
                fetch_ext: "webm",
            }
        }

        fn probes_seen(&self) -> Vec<String> {
            self.probe_calls.lock().unwrap().clone()
        }

        fn fetches_seen(&self) -> Vec<String> {
            self.fetch_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaExtractor for FakeExtractor {
        async fn probe(&self, _url: &str, options: &ExtractorOptions) -> Result<RawProbe, DownloadError> {
            let mut calls = self.probe_calls.lock().unwrap();
            let attempt = calls.len();
            calls.push(options.player_clients.join(","));
            if attempt < self.probe_failures {
                return Err(DownloadError::Extractor("HTTP Error 403: Forbidden".to_string()));
            }
            Ok(self.probe_result.clone())
        }

        async fn fetch(&self, request: &FetchRequest) -> Result<(), DownloadError> {
            let mut calls = self.fetch_calls.lock().unwrap();
            let attempt = calls.len();
            calls.push(request.options.player_clients.join(","));
            if attempt < self.fetch_failures {
                return Err(DownloadError::Extractor("HTTP Error 403: Forbidden".to_string()));
            }
            // Simulate yt-dlp materializing a file for the template
            let template = request.output_template.to_string_lossy().to_string();
            let concrete = template.replace("%(ext)s", self.fetch_ext);
            std::fs::write(&concrete, b"media").unwrap();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_probe_first_variant_succeeds() {
        let fake = Arc::new(FakeExtractor::new(0, 0));
        let chain = StrategyChain::new(fake.clone());

        let info = chain.probe("https://youtu.be/abc").await.unwrap();
        assert_eq!(info.title, "A Title");
        assert_eq!(info.duration_secs, 123);
        assert_eq!(info.upload_date, "20240110");
        assert_eq!(info.thumbnail, "");
        assert_eq!(fake.probes_seen(), vec!["android,web"]);
    }

    #[tokio::test]
    async fn test_probe_falls_through_variants() {
        let fake = Arc::new(FakeExtractor::new(2, 0));
        let chain = StrategyChain::new(fake.clone());

        let info = chain.probe("https://youtu.be/abc").await.unwrap();
        assert_eq!(info.uploader, "Someone");
        // default failed, android-only failed, mobile-web succeeded
        assert_eq!(fake.probes_seen(), vec!["android,web", "android", "web"]);
    }

    #[tokio::test]
    async fn test_probe_all_variants_fail_returns_last_error() {
        let fake = Arc::new(FakeExtractor::new(99, 0));
        let chain = StrategyChain::new(fake.clone());

        let err = chain.probe("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, DownloadError::Extractor(_)));
        assert_eq!(fake.probes_seen().len(), PROBE_VARIANTS.len());
    }

    #[tokio::test]
    async fn test_probe_defaults_for_missing_fields() {
        let mut fake = FakeExtractor::new(0, 0);
        fake.probe_result = RawProbe::default();
        let chain = StrategyChain::new(Arc::new(fake));

        let info = chain.probe("https://youtu.be/abc").await.unwrap();
        assert_eq!(info.title, "Unknown");
        assert_eq!(info.uploader, "Unknown");
        assert_eq!(info.duration_secs, 0);
        assert_eq!(info.view_count, 0);
        assert_eq!(info.description, "");
        assert_eq!(info.upload_date, "");
        assert_eq!(info.webpage_url, "https://youtu.be/abc");
    }

    #[tokio::test]
    async fn test_probe_truncates_long_description() {
        let mut fake = FakeExtractor::new(0, 0);
        fake.probe_result.description = Some("d".repeat(500));
        let chain = StrategyChain::new(Arc::new(fake));

        let info = chain.probe("https://youtu.be/abc").await.unwrap();
        assert_eq!(info.description.chars().count(), 203);
        assert!(info.description.ends_with("..."));
    }

    #[tokio::test]
    async fn test_retrieve_video_names_artifact_after_title_and_quality() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new(0, 0));
        let chain = StrategyChain::new(fake.clone());

        let media = chain
            .retrieve("https://youtu.be/abc", QualitySpec::Video(VideoQuality::P720), dir.path())
            .await
            .unwrap();
        assert_eq!(media.path, dir.path().join("A Title_720p.webm"));
        assert_eq!(media.title, "A Title");
        assert_eq!(media.quality, "720p");
        assert_eq!(media.info.view_count, 42);
        assert_eq!(fake.fetches_seen(), vec!["android,web"]);
    }

    #[tokio::test]
    async fn test_retrieve_falls_back_to_second_variant() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new(0, 1));
        let chain = StrategyChain::new(fake.clone());

        let media = chain
            .retrieve(
                "https://youtu.be/abc",
                QualitySpec::Audio(AudioQuality::Kbps192),
                dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(media.path, dir.path().join("A Title_192kbps.webm"));
        assert_eq!(fake.fetches_seen(), vec!["android,web", "android"]);
    }

    #[tokio::test]
    async fn test_retrieve_sanitizes_title_before_naming() {
        let dir = tempfile::tempdir().unwrap();
        let mut fake = FakeExtractor::new(0, 0);
        fake.probe_result.title = Some("bad/title: here?".to_string());
        let chain = StrategyChain::new(Arc::new(fake));

        let media = chain
            .retrieve("https://youtu.be/abc", QualitySpec::Video(VideoQuality::P360), dir.path())
            .await
            .unwrap();
        assert_eq!(media.title, "bad_title_ here_");
        assert_eq!(media.path, dir.path().join("bad_title_ here__360p.webm"));
    }

    #[tokio::test]
    async fn test_retrieve_exhausted_variants() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new(0, 99));
        let chain = StrategyChain::new(fake.clone());

        let err = chain
            .retrieve("https://youtu.be/abc", QualitySpec::Video(VideoQuality::P360), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Extractor(_)));
        assert_eq!(fake.fetches_seen().len(), DOWNLOAD_VARIANTS.len());
    }

    #[tokio::test]
    async fn test_retrieve_probe_failure_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new(99, 0));
        let chain = StrategyChain::new(fake.clone());

        let err = chain
            .retrieve("https://youtu.be/abc", QualitySpec::Video(VideoQuality::P720), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Extractor(_)));
        assert!(fake.fetches_seen().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_3gp_single_attempt_and_rename() {
        let dir = tempfile::tempdir().unwrap();
        let mut fake = FakeExtractor::new(0, 0);
        fake.probe_result.title = Some("Old Phone".to_string());
        let fake = Arc::new(fake);
        let chain = StrategyChain::new(fake.clone());

        let media = chain
            .retrieve(
                "https://youtu.be/abc",
                QualitySpec::Video(VideoQuality::ThreeGp),
                dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(media.path, dir.path().join("Old Phone_3gp.mp4"));
        assert!(media.path.exists());
        assert!(!dir.path().join("temp_Old Phone.webm").exists());
        assert_eq!(fake.fetches_seen().len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_3gp_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new(0, 1));
        let chain = StrategyChain::new(fake.clone());

        let err = chain
            .retrieve(
                "https://youtu.be/abc",
                QualitySpec::Video(VideoQuality::ThreeGp),
                dir.path(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Extractor(_)));
        assert_eq!(fake.fetches_seen().len(), 1);
    }
}

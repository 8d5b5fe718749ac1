//! yt-dlp backed [`MediaExtractor`] implementation.
//!
//! Each call maps to exactly one yt-dlp invocation with a fixed option set.
//! Output is captured in full; probe output is expected to be a single JSON
//! document (`--dump-json`).

use crate::core::config;
use crate::download::error::DownloadError;
use crate::download::extractor::{FetchRequest, MediaExtractor, RawProbe};
use crate::download::strategy::ExtractorOptions;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Production extractor shelling out to the yt-dlp binary.
pub struct YtDlpExtractor {
    binary: String,
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        YtDlpExtractor {
            binary: config::YTDL_BIN.clone(),
        }
    }

    /// Args shared by probe and fetch, derived from the option set.
    fn build_common_args(options: &ExtractorOptions) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--user-agent".to_string(),
            options.user_agent.clone(),
            "--referer".to_string(),
            options.referer.clone(),
            "--add-header".to_string(),
            "Accept-Language:en-us,en;q=0.5".to_string(),
            "--socket-timeout".to_string(),
            options.socket_timeout_secs.to_string(),
            "--retries".to_string(),
            options.retries.to_string(),
            "--fragment-retries".to_string(),
            options.fragment_retries.to_string(),
            "--concurrent-fragments".to_string(),
            options.concurrent_fragments.to_string(),
            "--http-chunk-size".to_string(),
            options.http_chunk_size.to_string(),
        ];

        let mut extractor_args = format!(
            "youtube:player_client={};player_skip={}",
            options.player_clients.join(","),
            options.player_skip.join(",")
        );
        if options.skip_hls {
            extractor_args.push_str(";skip=hls");
        }
        args.push("--extractor-args".to_string());
        args.push(extractor_args);

        if options.geo_bypass {
            args.push("--geo-bypass".to_string());
        }

        if let Some(ref cookies) = options.cookies_file {
            let expanded = shellexpand::tilde(cookies).to_string();
            args.push("--cookies".to_string());
            args.push(expanded);
        }

        args
    }

    /// Runs yt-dlp with the given args, enforcing the configured timeout.
    async fn run(&self, args: &[String]) -> Result<std::process::Output, DownloadError> {
        log::debug!("Running {} {}", self.binary, args.join(" "));

        let mut command = Command::new(&self.binary);
        command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        // Dropping the future on timeout must not leave yt-dlp running
        command.kill_on_drop(true);

        let output = tokio::time::timeout(config::extraction::ytdlp_timeout(), command.output())
            .await
            .map_err(|_| {
                DownloadError::Timeout(format!(
                    "yt-dlp did not finish within {}s",
                    config::extraction::YTDLP_TIMEOUT_SECS
                ))
            })?
            .map_err(|e| DownloadError::Process(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Extractor(stderr.trim().to_string()));
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn probe(&self, url: &str, options: &ExtractorOptions) -> Result<RawProbe, DownloadError> {
        let mut args = vec![
            url.to_string(),
            "--dump-json".to_string(),
            "--no-download".to_string(),
        ];
        args.extend(Self::build_common_args(options));

        let output = self.run(&args).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        serde_json::from_str(stdout.trim())
            .map_err(|e| DownloadError::Extractor(format!("Unparseable metadata from yt-dlp: {}", e)))
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<(), DownloadError> {
        let mut args = vec![
            request.url.clone(),
            "-f".to_string(),
            request.format_selector.clone(),
            "-o".to_string(),
            request.output_template.to_string_lossy().to_string(),
            "--newline".to_string(),
        ];
        args.extend(Self::build_common_args(&request.options));

        self.run(&args).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_args_include_strategy_fields() {
        let opts = ExtractorOptions::base();
        let args = YtDlpExtractor::build_common_args(&opts);

        let joined = args.join(" ");
        assert!(joined.contains("--user-agent"));
        assert!(joined.contains("--referer"));
        assert!(joined.contains("player_client=android,web"));
        assert!(joined.contains("player_skip=configs"));
        assert!(joined.contains("skip=hls"));
        assert!(joined.contains("--geo-bypass"));
        assert!(joined.contains("--http-chunk-size 5242880"));
    }

    #[test]
    fn test_common_args_android_only_variant() {
        let mut opts = ExtractorOptions::base();
        opts.player_clients = vec!["android"];
        opts.player_skip = vec!["configs", "webpage"];
        let joined = YtDlpExtractor::build_common_args(&opts).join(" ");
        assert!(joined.contains("player_client=android;player_skip=configs,webpage"));
    }

    #[test]
    fn test_cookies_flag_only_when_configured() {
        let mut opts = ExtractorOptions::base();
        opts.cookies_file = None;
        let args = YtDlpExtractor::build_common_args(&opts);
        assert!(!args.contains(&"--cookies".to_string()));

        opts.cookies_file = Some("/tmp/cookies.txt".to_string());
        let args = YtDlpExtractor::build_common_args(&opts);
        assert!(args.contains(&"--cookies".to_string()));
        assert!(args.contains(&"/tmp/cookies.txt".to_string()));
    }
}

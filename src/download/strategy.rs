//! Extraction strategy variants.
//!
//! The source site throttles and blocks differently depending on which player
//! client the extractor impersonates, so probing and retrieval each walk an
//! ordered list of variants until one succeeds. Every variant starts from the
//! same base options; a variant only records what it overrides, and `merged()`
//! produces the final immutable option set handed to the extractor.

use crate::core::config;

const DESKTOP_CHROME_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MOBILE_FIREFOX_UA: &str = "Mozilla/5.0 (Android 11; Mobile; rv:68.0) Gecko/68.0 Firefox/88.0";

/// Complete option set for a single extractor invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorOptions {
    pub user_agent: String,
    pub referer: String,
    /// Player clients the extractor impersonates, in preference order
    pub player_clients: Vec<&'static str>,
    /// Extraction steps the impersonated player skips
    pub player_skip: Vec<&'static str>,
    /// Whether HLS manifests are skipped (progressive formats only)
    pub skip_hls: bool,
    pub socket_timeout_secs: u64,
    pub retries: u32,
    pub fragment_retries: u32,
    pub concurrent_fragments: u32,
    pub http_chunk_size: u64,
    pub geo_bypass: bool,
    /// Netscape-format cookies file, when an authenticated session is configured
    pub cookies_file: Option<String>,
}

impl ExtractorOptions {
    /// The shared baseline every variant starts from.
    pub fn base() -> Self {
        ExtractorOptions {
            user_agent: DESKTOP_CHROME_UA.to_string(),
            referer: "https://www.youtube.com/".to_string(),
            player_clients: vec!["android", "web"],
            player_skip: vec!["configs"],
            skip_hls: true,
            socket_timeout_secs: config::extraction::SOCKET_TIMEOUT_SECS,
            retries: 5,
            fragment_retries: 5,
            concurrent_fragments: 2,
            http_chunk_size: config::extraction::HTTP_CHUNK_SIZE,
            geo_bypass: true,
            cookies_file: config::YTDL_COOKIES_FILE.clone(),
        }
    }
}

/// A named set of overrides on top of [`ExtractorOptions::base`].
#[derive(Debug, Clone, Copy)]
pub struct StrategyVariant {
    pub name: &'static str,
    user_agent: Option<&'static str>,
    player_clients: Option<&'static [&'static str]>,
    player_skip: Option<&'static [&'static str]>,
}

impl StrategyVariant {
    /// Resolves this variant into a full option set.
    pub fn merged(&self) -> ExtractorOptions {
        let mut opts = ExtractorOptions::base();
        if let Some(ua) = self.user_agent {
            opts.user_agent = ua.to_string();
        }
        if let Some(clients) = self.player_clients {
            opts.player_clients = clients.to_vec();
        }
        if let Some(skip) = self.player_skip {
            opts.player_skip = skip.to_vec();
        }
        opts
    }
}

/// Variants tried when probing metadata, in order.
pub const PROBE_VARIANTS: &[StrategyVariant] = &[
    StrategyVariant {
        name: "default",
        user_agent: None,
        player_clients: None,
        player_skip: None,
    },
    // Android client is more reliable without cookies
    StrategyVariant {
        name: "android-only",
        user_agent: None,
        player_clients: Some(&["android"]),
        player_skip: Some(&["configs", "webpage"]),
    },
    StrategyVariant {
        name: "mobile-web",
        user_agent: Some(MOBILE_FIREFOX_UA),
        player_clients: Some(&["web"]),
        player_skip: None,
    },
];

/// Variants tried when retrieving media, in order.
pub const DOWNLOAD_VARIANTS: &[StrategyVariant] = &[
    StrategyVariant {
        name: "default",
        user_agent: None,
        player_clients: None,
        player_skip: None,
    },
    StrategyVariant {
        name: "android-only",
        user_agent: None,
        player_clients: Some(&["android"]),
        player_skip: Some(&["configs", "webpage"]),
    },
];

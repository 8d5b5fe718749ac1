//! URL and title validation utilities
//!
//! Provides validation for user inputs:
//! - Supported-site URL classification (whitelist-based)
//! - Video ID extraction
//! - Title sanitization for filesystem-safe artifact names

use url::Url;

/// Hosts accepted for watch/embed/shorts style paths.
const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Characters replaced with `_` when sanitizing titles.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum sanitized title length in characters.
const MAX_TITLE_CHARS: usize = 100;

/// Checks whether a string is a supported media URL.
///
/// Recognized shapes (case-insensitive, scheme and `www` optional):
/// - `youtube.com/watch?v=ID`
/// - `youtu.be/ID`
/// - `youtube.com/embed/ID`
/// - `youtube.com/v/ID`
/// - `youtube.com/shorts/ID`
/// - `m.youtube.com/watch?v=ID`
///
/// Never panics; any non-matching input yields `false`.
///
/// # Examples
/// ```
/// use tubefetch::core::validation::is_supported_media_url;
///
/// assert!(is_supported_media_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(is_supported_media_url("youtu.be/dQw4w9WgXcQ"));
/// assert!(!is_supported_media_url("https://example.com/watch?v=dQw4w9WgXcQ"));
/// ```
pub fn is_supported_media_url(raw: &str) -> bool {
    extract_video_id(raw).is_some()
}

/// Extracts the video ID from a supported media URL.
///
/// Returns `None` for anything that is not one of the recognized URL shapes.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Scheme is optional in user input; Url::parse requires one
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme).ok()?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return None,
    }

    // Url lowercases the host during parsing
    let host = parsed.host_str()?;

    if host == "youtu.be" {
        let id = parsed.path_segments()?.next()?;
        return valid_video_id(id).then(|| id.to_string());
    }

    if !WATCH_HOSTS.contains(&host) {
        return None;
    }

    let mut segments = parsed.path_segments()?;
    let first = segments.next()?;

    if first.eq_ignore_ascii_case("watch") {
        let id = parsed
            .query_pairs()
            .find(|(k, _)| k.eq_ignore_ascii_case("v"))
            .map(|(_, v)| v.to_string())?;
        return valid_video_id(&id).then_some(id);
    }

    if first.eq_ignore_ascii_case("embed") || first.eq_ignore_ascii_case("v") || first.eq_ignore_ascii_case("shorts") {
        let id = segments.next()?;
        return valid_video_id(id).then(|| id.to_string());
    }

    None
}

fn valid_video_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Sanitizes an arbitrary title into a filesystem-safe name.
///
/// - Each of `< > : " / \ | ? *` becomes `_`
/// - Whitespace runs collapse to a single space
/// - Leading/trailing whitespace and dots are trimmed
/// - Results longer than 100 characters are truncated to 97 + `…`
/// - An empty result becomes `"unknown"`
///
/// Total and idempotent: `sanitize_title(sanitize_title(x)) == sanitize_title(x)`.
pub fn sanitize_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect();

    // Collapse internal whitespace runs to single spaces
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let trimmed = collapsed.trim_matches(|c: char| c == '.' || c.is_whitespace());

    let mut result: String = if trimmed.chars().count() > MAX_TITLE_CHARS {
        let mut cut: String = trimmed.chars().take(MAX_TITLE_CHARS - 3).collect();
        // Truncation may expose a trailing dot or space again
        while cut.ends_with('.') || cut.ends_with(' ') {
            cut.pop();
        }
        cut.push('…');
        cut
    } else {
        trimmed.to_string()
    };

    if result.is_empty() {
        result = "unknown".to_string();
    }

    result
}

//! Classification of extractor failures.
//!
//! yt-dlp reports everything through stderr text, so the only way to tell a
//! bot-detection block from a dead link is signature matching. The humanized
//! messages produced here are what ends up in a failed job record.

/// Failure categories recognized in extractor stderr.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionErrorKind {
    /// The source site refused the request (bot detection, HTTP 403)
    AccessBlocked,
    /// The source site demands an authenticated session
    SignInRequired,
    /// Media is private, removed, or region-locked
    Unavailable,
    /// Timeouts, connection resets, DNS failures
    Network,
    /// Anything else
    Unknown,
}

/// Analyzes extractor stderr and determines the failure category.
pub fn classify_extraction_error(stderr: &str) -> ExtractionErrorKind {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("sign in to confirm")
        || stderr_lower.contains("please sign in")
        || stderr_lower.contains("cookies are no longer valid")
        || stderr_lower.contains("use --cookies-from-browser")
        || stderr_lower.contains("use --cookies for the authentication")
    {
        return ExtractionErrorKind::SignInRequired;
    }

    if stderr_lower.contains("http error 403")
        || stderr_lower.contains("403")
        || stderr_lower.contains("forbidden")
        || stderr_lower.contains("bot detection")
        || stderr_lower.contains("signature extraction failed")
    {
        return ExtractionErrorKind::AccessBlocked;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("video is not available")
    {
        return ExtractionErrorKind::Unavailable;
    }

    if stderr_lower.contains("timeout")
        || stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("socket")
        || stderr_lower.contains("dns")
        || stderr_lower.contains("failed to connect")
    {
        return ExtractionErrorKind::Network;
    }

    ExtractionErrorKind::Unknown
}

/// True when the failure is the source site actively refusing service, as
/// opposed to the media simply being gone or the network flaking.
pub fn is_block_error(stderr: &str) -> bool {
    matches!(
        classify_extraction_error(stderr),
        ExtractionErrorKind::AccessBlocked | ExtractionErrorKind::SignInRequired
    )
}

/// Turns raw extractor stderr into a message fit for a job record.
///
/// Block-category failures are rewritten into actionable guidance instead of
/// surfacing raw HTTP status noise; other categories keep a short factual
/// description with the original detail attached.
pub fn humanize_extraction_error(stderr: &str) -> String {
    match classify_extraction_error(stderr) {
        ExtractionErrorKind::AccessBlocked => {
            "The source site blocked this request as automated traffic. \
             Retrying later may help; for reliable access configure an \
             authenticated session cookie file (YTDL_COOKIES_FILE)."
                .to_string()
        }
        ExtractionErrorKind::SignInRequired => {
            "The source site requires a signed-in session for this media. \
             Export browser cookies to a Netscape-format file and set \
             YTDL_COOKIES_FILE to its path."
                .to_string()
        }
        ExtractionErrorKind::Unavailable => {
            "This media is unavailable. It may be private, removed, or restricted in this region.".to_string()
        }
        ExtractionErrorKind::Network => {
            format!("Network problem while contacting the source site: {}", first_line(stderr))
        }
        ExtractionErrorKind::Unknown => format!("Extraction failed: {}", first_line(stderr)),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("no details").trim()
}

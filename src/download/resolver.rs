//! Artifact resolution after an extractor run.
//!
//! yt-dlp chooses the container extension itself (`%(ext)s` in the output
//! template), so the file that lands on disk is not fully known up front.
//! Resolution is two-phase: try the expected stem with each candidate
//! extension, then fall back to scanning the directory for any file whose
//! name starts with the stem.

use crate::download::quality::MediaKind;
use std::path::{Path, PathBuf};

/// Container extensions tried for video artifacts, in likelihood order.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "flv"];

/// Container extensions tried for audio artifacts, in likelihood order.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "webm", "opus"];

/// Extension candidates for the given media kind.
pub fn extension_candidates(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Video => VIDEO_EXTENSIONS,
        MediaKind::Audio => AUDIO_EXTENSIONS,
    }
}

/// Locates the artifact produced for `stem` under `dir`.
///
/// Phase 1 checks `{dir}/{stem}.{ext}` for each candidate extension.
/// Phase 2 scans `dir` and returns the first regular file whose name starts
/// with `stem`. Returns `None` when nothing matches.
pub fn resolve_artifact(dir: &Path, stem: &str, kind: MediaKind) -> Option<PathBuf> {
    for ext in extension_candidates(kind) {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    // Extractor may have picked an unexpected container; match on stem prefix
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let starts_with_stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(stem));
        if starts_with_stem {
            log::info!("Resolved artifact by prefix scan: {}", path.display());
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_candidate_extension_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clip.webm"), b"v").unwrap();
        fs::write(dir.path().join("clip.mkv"), b"v").unwrap();

        let found = resolve_artifact(dir.path(), "clip", MediaKind::Video).unwrap();
        // mp4 is absent, so webm wins over mkv
        assert_eq!(found, dir.path().join("clip.webm"));
    }

    #[test]
    fn test_resolves_audio_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("track.m4a"), b"a").unwrap();
        let found = resolve_artifact(dir.path(), "track", MediaKind::Audio).unwrap();
        assert_eq!(found, dir.path().join("track.m4a"));
    }

    #[test]
    fn test_falls_back_to_prefix_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clip.ogv"), b"v").unwrap();
        let found = resolve_artifact(dir.path(), "clip", MediaKind::Video).unwrap();
        assert_eq!(found, dir.path().join("clip.ogv"));
    }

    #[test]
    fn test_prefix_scan_ignores_other_stems() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("other.mp4"), b"v").unwrap();
        assert_eq!(resolve_artifact(dir.path(), "clip", MediaKind::Video), None);
    }

    #[test]
    fn test_missing_dir_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert_eq!(resolve_artifact(&missing, "clip", MediaKind::Video), None);
    }

    #[test]
    fn test_directories_are_not_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("clip.mp4")).unwrap();
        assert_eq!(resolve_artifact(dir.path(), "clip", MediaKind::Video), None);
    }
}

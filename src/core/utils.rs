//! Small display and filesystem helpers shared across modules

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Format file size for display
pub fn format_file_size(bytes: i64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format duration for display
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Delete files under `dir` (recursing into per-job subdirectories) whose
/// modification time is older than `max_age`.
///
/// Returns the number of files removed. Unreadable entries are skipped with
/// a warning rather than aborting the sweep.
pub fn cleanup_old_files(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    if !dir.exists() {
        return Ok(0);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();

        if path.is_dir() {
            removed += cleanup_old_files(&path, max_age)?;
            // Drop the per-job directory itself once it is empty
            if std::fs::read_dir(&path).map(|mut d| d.next().is_none()).unwrap_or(false) {
                if let Err(e) = std::fs::remove_dir(&path) {
                    log::warn!("Failed to remove empty directory {}: {}", path.display(), e);
                }
            }
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age > max_age {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Removed stale artifact: {}", path.display());
                    removed += 1;
                }
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    Ok(removed)
}

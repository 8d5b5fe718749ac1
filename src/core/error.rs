use crate::download::error::DownloadError;
use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Retrieval/extraction errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Validation errors (bad URL form, kind, or quality) — rejected before
    /// any job record exists
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown or incomplete job identity
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = AppError::Validation("unsupported URL".to_string());
        assert_eq!(err.to_string(), "Validation error: unsupported URL");
    }

    #[test]
    fn test_download_error_converts() {
        let err: AppError = DownloadError::Extractor("blocked".to_string()).into();
        assert!(matches!(err, AppError::Download(_)));
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_not_found_display() {
        let err = AppError::NotFound("job 42".to_string());
        assert_eq!(err.to_string(), "Not found: job 42");
    }
}

//! Media retrieval: strategy variants, extractor seam, and artifact resolution

pub mod block;
pub mod chain;
pub mod error;
pub mod extractor;
pub mod quality;
pub mod resolver;
pub mod strategy;
pub mod ytdlp;

// Re-exports for convenience
pub use block::{classify_extraction_error, humanize_extraction_error, is_block_error, ExtractionErrorKind};
pub use chain::{MediaInfo, RetrievedMedia, StrategyChain};
pub use error::DownloadError;
pub use extractor::{FetchRequest, MediaExtractor, RawProbe};
pub use quality::{AudioQuality, MediaKind, QualitySpec, VideoQuality};
pub use ytdlp::YtDlpExtractor;

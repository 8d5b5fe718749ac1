//! Media kinds and quality tiers.
//!
//! Quality labels are part of the public job API (they are stored verbatim in
//! job records), so parsing is strict: anything outside the known sets is a
//! validation failure, never a silent default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of artifact a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Parses the wire label ("video" / "audio").
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "video" => Some(MediaKind::Video),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video quality tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoQuality {
    /// Legacy low-bandwidth tier, capped at 240p source material
    ThreeGp,
    P360,
    P480,
    P720,
    P1080,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 5] = [
        VideoQuality::ThreeGp,
        VideoQuality::P360,
        VideoQuality::P480,
        VideoQuality::P720,
        VideoQuality::P1080,
    ];

    /// Parses the wire label. Unknown labels are rejected.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "3gp" => Some(VideoQuality::ThreeGp),
            "360p" => Some(VideoQuality::P360),
            "480p" => Some(VideoQuality::P480),
            "720p" => Some(VideoQuality::P720),
            "1080p" => Some(VideoQuality::P1080),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoQuality::ThreeGp => "3gp",
            VideoQuality::P360 => "360p",
            VideoQuality::P480 => "480p",
            VideoQuality::P720 => "720p",
            VideoQuality::P1080 => "1080p",
        }
    }

    /// yt-dlp format selector for this tier.
    pub fn format_selector(&self) -> &'static str {
        match self {
            VideoQuality::ThreeGp => "worst[height<=240]/worst",
            VideoQuality::P360 => "best[height<=360]",
            VideoQuality::P480 => "best[height<=480]",
            VideoQuality::P720 => "best[height<=720]",
            VideoQuality::P1080 => "best[height<=1080]",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audio bitrate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioQuality {
    Kbps128,
    Kbps192,
    Kbps256,
    Kbps320,
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 4] = [
        AudioQuality::Kbps128,
        AudioQuality::Kbps192,
        AudioQuality::Kbps256,
        AudioQuality::Kbps320,
    ];

    /// Parses the wire label. Unknown labels are rejected.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "128kbps" => Some(AudioQuality::Kbps128),
            "192kbps" => Some(AudioQuality::Kbps192),
            "256kbps" => Some(AudioQuality::Kbps256),
            "320kbps" => Some(AudioQuality::Kbps320),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioQuality::Kbps128 => "128kbps",
            AudioQuality::Kbps192 => "192kbps",
            AudioQuality::Kbps256 => "256kbps",
            AudioQuality::Kbps320 => "320kbps",
        }
    }

    /// Bitrate in kbit/s, as passed to ffmpeg's `-b:a`.
    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            AudioQuality::Kbps128 => 128,
            AudioQuality::Kbps192 => 192,
            AudioQuality::Kbps256 => 256,
            AudioQuality::Kbps320 => 320,
        }
    }

    /// Format selector used when pulling the source stream for transcoding.
    pub fn format_selector(&self) -> &'static str {
        "bestaudio/best"
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated kind + quality pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySpec {
    Video(VideoQuality),
    Audio(AudioQuality),
}

impl QualitySpec {
    /// Validates a (kind, quality) label pair. A video quality with an audio
    /// kind (or vice versa) is rejected.
    pub fn parse(kind: MediaKind, quality_label: &str) -> Option<Self> {
        match kind {
            MediaKind::Video => VideoQuality::parse(quality_label).map(QualitySpec::Video),
            MediaKind::Audio => AudioQuality::parse(quality_label).map(QualitySpec::Audio),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            QualitySpec::Video(_) => MediaKind::Video,
            QualitySpec::Audio(_) => MediaKind::Audio,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualitySpec::Video(q) => q.label(),
            QualitySpec::Audio(q) => q.label(),
        }
    }

    pub fn format_selector(&self) -> &'static str {
        match self {
            QualitySpec::Video(q) => q.format_selector(),
            QualitySpec::Audio(q) => q.format_selector(),
        }
    }
}

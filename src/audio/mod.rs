//! Audio acquisition for Innsikt.
//!
//! Downloads podcast audio from a media URL into a caller-supplied working
//! directory and prepares it for transcription.

mod downloader;

pub use downloader::{download_audio, probe_duration, split_audio};

use crate::config::DownloadSettings;
use crate::error::{InnsiktError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Trait for audio acquisition backends.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the best audio stream for `url` into `workdir` and return
    /// the path of the extracted audio file.
    async fn fetch(&self, url: &str, workdir: &Path) -> Result<PathBuf>;
}

/// yt-dlp backed fetcher.
pub struct YtDlpFetcher {
    settings: DownloadSettings,
}

impl YtDlpFetcher {
    pub fn new(settings: DownloadSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, workdir: &Path) -> Result<PathBuf> {
        validate_media_url(url)?;
        download_audio(url, &self.settings, workdir).await
    }
}

/// Reject inputs that are not plausible media URLs before invoking yt-dlp.
pub fn validate_media_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(InnsiktError::InvalidInput("URL must not be empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| InnsiktError::InvalidInput(format!("Not a valid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(InnsiktError::InvalidInput(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}

/// Extract the video ID from a YouTube URL, if it is one.
///
/// Used for log fields; non-YouTube media URLs are still accepted.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let re = Regex::new(
        r"(?x)
        (?:https?://)?
        (?:www\.)?
        (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
        ([a-zA-Z0-9_-]{11})
    ",
    )
    .expect("static pattern");

    re.captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_media_url() {
        assert!(validate_media_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
        assert!(validate_media_url("http://example.com/episode.mp3").is_ok());

        assert!(validate_media_url("").is_err());
        assert!(validate_media_url("   ").is_err());
        assert!(validate_media_url("not a url").is_err());
        assert!(validate_media_url("ftp://example.com/a.mp3").is_err());
    }

    #[test]
    fn test_youtube_video_id() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(youtube_video_id("https://example.com/episode.mp3"), None);
    }
}

//! yt-dlp and ffmpeg plumbing.
//!
//! Everything here shells out. Tool availability is surfaced as
//! `ToolNotFound` so the CLI can point at the missing binary instead of a
//! cryptic IO error.

use crate::config::DownloadSettings;
use crate::error::{InnsiktError, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// File stem of the audio written into a run's working directory.
const AUDIO_STEM: &str = "podcast";

/// Extensions yt-dlp is known to hand back when asked for audio only.
const KNOWN_AUDIO_EXTENSIONS: &[&str] = &["mp3", "opus", "m4a", "webm", "ogg"];

/// Run an external tool to completion, capturing its output.
async fn run_tool(name: &'static str, command: &mut Command) -> Result<std::process::Output> {
    match command.output().await {
        Ok(output) => Ok(output),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(InnsiktError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(InnsiktError::ToolFailed(format!("{}: {}", name, e))),
    }
}

/// Download the best audio stream for `url` into `dir`.
///
/// yt-dlp extracts to the configured format; a download that still comes out
/// in some other container is re-encoded to MP3. The returned path's
/// extension always matches its contents.
///
/// Each run owns a freshly created directory, so two runs can never clobber
/// each other's download.
#[instrument(skip(settings, dir), fields(url = %url))]
pub async fn download_audio(url: &str, settings: &DownloadSettings, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let target = dir.join(format!("{}.{}", AUDIO_STEM, settings.audio_format));
    let template = dir.join(format!("{}.%(ext)s", AUDIO_STEM));

    info!("Starting yt-dlp download");

    let mut command = Command::new("yt-dlp");
    command
        .arg("--extract-audio")
        .args(["--audio-format", &settings.audio_format])
        .args(["--audio-quality", &settings.audio_quality])
        .arg("--output")
        .arg(&template)
        .args(["--no-playlist", "--quiet", "--no-warnings"])
        .arg(url);

    let output = run_tool("yt-dlp", &mut command).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InnsiktError::AudioDownload(format!(
            "yt-dlp: {}",
            stderr.trim()
        )));
    }

    let downloaded = locate_download(dir)?;
    match normalized_destination(&downloaded, &target) {
        None => Ok(downloaded),
        Some(normalized) => {
            // yt-dlp sometimes leaves the source container in place
            transcode_to_mp3(&downloaded, &normalized).await?;
            let _ = std::fs::remove_file(&downloaded);
            Ok(normalized)
        }
    }
}

/// Where a download has to be re-encoded to, if anywhere.
///
/// Files already in the configured container, or already MP3, pass through
/// untouched. Anything else gets an MP3 sibling path; the re-encode always
/// emits MP3, whatever format is configured.
fn normalized_destination(downloaded: &Path, target: &Path) -> Option<PathBuf> {
    let is_mp3 = downloaded.extension().and_then(|e| e.to_str()) == Some("mp3");
    if downloaded == target || is_mp3 {
        return None;
    }
    Some(downloaded.with_file_name(format!("{}.mp3", AUDIO_STEM)))
}

/// Find the file yt-dlp produced for this run.
fn locate_download(dir: &Path) -> Result<PathBuf> {
    for ext in KNOWN_AUDIO_EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", AUDIO_STEM, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Unexpected container; take whatever matches the stem.
    std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().starts_with(AUDIO_STEM))
                .unwrap_or(false)
        })
        .ok_or_else(|| {
            InnsiktError::AudioDownload(
                "yt-dlp reported success but produced no audio file".to_string(),
            )
        })
}

/// Re-encode an arbitrary audio container to MP3.
async fn transcode_to_mp3(source: &Path, dest: &Path) -> Result<()> {
    debug!("Transcoding {} to mp3", source.display());

    let mut command = Command::new("ffmpeg");
    command
        .arg("-i")
        .arg(source)
        .args(["-vn", "-codec:a", "libmp3lame", "-qscale:a", "2"])
        .args(["-y", "-loglevel", "error"])
        .arg(dest);

    let output = run_tool("ffmpeg", &mut command).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InnsiktError::AudioDownload(format!(
            "ffmpeg transcode: {}",
            stderr.trim()
        )));
    }
    Ok(())
}

/// Cut an audio file into chunks of roughly `chunk_seconds` for upload.
///
/// Returns (path, offset seconds) pairs in playback order. Files no longer
/// than one chunk come back as-is without touching ffmpeg.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(dir)?;

    let duration = probe_duration(source).await?;
    let chunk_len = f64::from(chunk_seconds);
    info!("Audio duration {:.1}s", duration);

    if duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("audio");
    let count = (duration / chunk_len).ceil() as u32;

    let mut chunks = Vec::with_capacity(count as usize);
    for index in 0..count {
        let offset = f64::from(index) * chunk_len;
        let length = chunk_len.min(duration - offset);
        let path = dir.join(format!("{}_{:04}.mp3", stem, index));

        cut_segment(source, &path, offset, length).await?;
        debug!("Cut chunk {} at {:.1}s", index, offset);
        chunks.push((path, offset));
    }

    info!("Split into {} chunks", chunks.len());
    Ok(chunks)
}

/// Extract one time window, preferring a lossless stream copy and falling
/// back to a re-encode when the container refuses to cut cleanly.
async fn cut_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    let mut copy = Command::new("ffmpeg");
    copy.args(["-ss", &format!("{:.3}", start)])
        .arg("-i")
        .arg(source)
        .args(["-t", &format!("{:.3}", length)])
        .args(["-c", "copy", "-y", "-loglevel", "error"])
        .arg(dest);

    if let Ok(output) = run_tool("ffmpeg", &mut copy).await {
        if output.status.success() && dest.exists() {
            return Ok(());
        }
    }

    warn!("Stream copy failed, re-encoding chunk at {:.0}s", start);

    let mut encode = Command::new("ffmpeg");
    encode
        .args(["-ss", &format!("{:.3}", start)])
        .arg("-i")
        .arg(source)
        .args(["-t", &format!("{:.3}", length)])
        .args(["-codec:a", "libmp3lame", "-qscale:a", "2"])
        .args(["-y", "-loglevel", "error"])
        .arg(dest);

    let output = run_tool("ffmpeg", &mut encode).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InnsiktError::AudioDownload(format!(
            "chunk extraction: {}",
            stderr.trim()
        )));
    }
    Ok(())
}

/// Measure a file's duration with ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let mut command = Command::new("ffprobe");
    command
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path);

    let output = run_tool("ffprobe", &mut command).await?;
    if !output.status.success() {
        return Err(InnsiktError::AudioDownload(format!(
            "ffprobe could not read {}",
            path.display()
        )));
    }

    let probe: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|_| InnsiktError::AudioDownload("unparseable ffprobe output".to_string()))?;

    probe["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| InnsiktError::AudioDownload("ffprobe reported no duration".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_download_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_download(dir.path()).is_err());
    }

    #[test]
    fn test_locate_download_prefers_known_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("podcast.m4a"), b"x").unwrap();
        std::fs::write(dir.path().join("podcast.description"), b"x").unwrap();

        assert_eq!(
            locate_download(dir.path()).unwrap(),
            dir.path().join("podcast.m4a")
        );
    }

    #[test]
    fn test_locate_download_falls_back_to_stem_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("podcast.aac"), b"x").unwrap();

        assert_eq!(
            locate_download(dir.path()).unwrap(),
            dir.path().join("podcast.aac")
        );
    }

    #[test]
    fn test_normalized_destination_accepts_the_configured_container() {
        let dir = Path::new("/run");
        let opus = dir.join("podcast.opus");

        assert_eq!(normalized_destination(&opus, &opus), None);
    }

    #[test]
    fn test_normalized_destination_keeps_mp3_under_any_config() {
        let dir = Path::new("/run");

        // Configured for opus, but the download is already MP3.
        assert_eq!(
            normalized_destination(&dir.join("podcast.mp3"), &dir.join("podcast.opus")),
            None
        );
    }

    #[test]
    fn test_normalized_destination_sends_odd_containers_to_mp3() {
        let dir = Path::new("/run");

        // The destination extension must say mp3 even when the configured
        // format is something else; that is what the re-encode produces.
        assert_eq!(
            normalized_destination(&dir.join("podcast.m4a"), &dir.join("podcast.opus")),
            Some(dir.join("podcast.mp3"))
        );
    }
}

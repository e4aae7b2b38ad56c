//! Configuration settings for Innsikt.

use crate::error::{InnsiktError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, one section per concern.
///
/// Every field has a default, so an absent or sparse config file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub download: DownloadSettings,
    pub transcription: TranscriptionSettings,
    pub pipeline: PipelineSettings,
    pub weaviate: WeaviateSettings,
    pub telemetry: TelemetrySettings,
    pub server: ServerSettings,
}

/// Settings that cut across every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for per-run temporary files (audio downloads, segments).
    pub temp_dir: String,
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/innsikt".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Audio download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Audio container to extract to.
    pub audio_format: String,
    /// Bitrate passed to yt-dlp (`--audio-quality`).
    pub audio_quality: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
        }
    }
}

/// Whisper upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Speech-to-text model to use.
    pub model: String,
    /// Duration in seconds for splitting long audio files before upload.
    pub chunk_duration_seconds: u32,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            chunk_duration_seconds: 600,
        }
    }
}

/// Agent pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Chat model backing both agents.
    pub model: String,
    /// How many characters of the transcript the extraction task sees.
    pub transcript_cutoff_chars: usize,
    /// Upper bound on tool-calling round trips per task.
    pub max_tool_iterations: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            transcript_cutoff_chars: 3000,
            max_tool_iterations: 8,
        }
    }
}

/// Weaviate connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaviateSettings {
    /// Cluster endpoint, e.g. `https://my-cluster.weaviate.network`.
    pub cluster_url: String,
    /// API key for the cluster. Prefer the `WEAVIATE_API_KEY` env var.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Collection (class) holding insight records.
    pub collection: String,
    /// Number of nearest neighbors returned per query.
    pub query_limit: usize,
}

impl Default for WeaviateSettings {
    fn default() -> Self {
        Self {
            cluster_url: String::new(),
            api_key: None,
            collection: "PodcastInsights".to_string(),
            query_limit: 3,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Project name attached to run traces.
    pub project_name: String,
    /// API key slot for a hosted trace sink. Prefer the `OPIK_API_KEY` env var.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            project_name: "Podcast-Startup-Summarizer".to_string(),
            api_key: None,
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default location; built-in defaults apply when
    /// no file exists there.
    pub fn load() -> Result<Self> {
        Self::from_path(&Self::default_config_path())
    }

    /// Load settings from an explicit config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_path(path)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let mut settings = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Environment wins over the file for endpoints and secrets.
    ///
    /// `OPENAI_API_KEY` is not handled here; the OpenAI client reads it on
    /// its own.
    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value("WEAVIATE_CLUSTER_URL") {
            self.weaviate.cluster_url = url;
        }
        if let Some(key) = env_value("WEAVIATE_API_KEY") {
            self.weaviate.api_key = Some(key);
        }
        if let Some(key) = env_value("OPIK_API_KEY") {
            self.telemetry.api_key = Some(key);
        }
    }

    /// Where `innsikt` looks for its config file by default.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("innsikt")
            .join("config.toml")
    }

    /// The temp directory with `~` expanded.
    pub fn temp_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.general.temp_dir).to_string())
    }
}

/// A non-empty environment variable, if one is set.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl WeaviateSettings {
    /// Check that the cluster endpoint is present and parses as a URL.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_url.is_empty() {
            return Err(InnsiktError::Config(
                "weaviate.cluster_url not set. Set it in config.toml or via WEAVIATE_CLUSTER_URL."
                    .to_string(),
            ));
        }

        url::Url::parse(&self.cluster_url).map_err(|e| {
            InnsiktError::Config(format!("weaviate.cluster_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.weaviate.collection, "PodcastInsights");
        assert_eq!(settings.weaviate.query_limit, 3);
        assert_eq!(settings.pipeline.transcript_cutoff_chars, 3000);
        assert_eq!(settings.pipeline.model, "gpt-4o-mini");
        assert_eq!(settings.download.audio_quality, "192K");
    }

    #[test]
    fn test_validate_cluster_url() {
        let mut weaviate = WeaviateSettings::default();
        assert!(weaviate.validate().is_err());

        weaviate.cluster_url = "not a url".to_string();
        assert!(weaviate.validate().is_err());

        weaviate.cluster_url = "https://demo.weaviate.network".to_string();
        assert!(weaviate.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            [pipeline]
            transcript_cutoff_chars = 1200
            "#,
        )
        .unwrap();

        assert_eq!(parsed.pipeline.transcript_cutoff_chars, 1200);
        assert_eq!(parsed.pipeline.model, "gpt-4o-mini");
        assert_eq!(parsed.weaviate.collection, "PodcastInsights");
    }

    #[test]
    fn test_load_from_reads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn test_load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = oops").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}

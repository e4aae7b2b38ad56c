//! Analysis orchestrator for Innsikt.
//!
//! Coordinates the entire run from audio download to the final agent
//! outputs. Every run gets its own working directory under the configured
//! temp root, removed again when the run finishes either way.

use crate::audio::{youtube_video_id, AudioFetcher, YtDlpFetcher};
use crate::config::Settings;
use crate::error::Result;
use crate::openai::{create_client, OpenAIClient};
use crate::pipeline::podcast_pipeline;
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::vector_store::{InsightStore, WeaviateStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The main orchestrator for the Innsikt analysis flow.
pub struct Orchestrator {
    settings: Settings,
    fetcher: Arc<dyn AudioFetcher>,
    transcriber: Arc<dyn Transcriber>,
    store: Arc<dyn InsightStore>,
    client: OpenAIClient,
    temp_root: PathBuf,
}

impl Orchestrator {
    /// Wire up the production components: yt-dlp, Whisper, and Weaviate.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = create_client();

        let fetcher = Arc::new(YtDlpFetcher::new(settings.download.clone()));
        let transcriber = Arc::new(WhisperTranscriber::new(
            client.clone(),
            &settings.transcription,
        ));
        let store = Arc::new(WeaviateStore::from_settings(&settings.weaviate)?);

        Self::with_components(settings, fetcher, transcriber, store, client)
    }

    /// Assemble an orchestrator from caller-chosen stage implementations.
    /// Tests swap in stub fetchers and stores through this.
    pub fn with_components(
        settings: Settings,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
        store: Arc<dyn InsightStore>,
        client: OpenAIClient,
    ) -> Result<Self> {
        let temp_root = settings.temp_dir();
        std::fs::create_dir_all(&temp_root)?;

        Ok(Self {
            settings,
            fetcher,
            transcriber,
            store,
            client,
            temp_root,
        })
    }

    /// Analyze one podcast episode: download, transcribe, run the agents.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn analyze(&self, url: &str) -> Result<PodcastAnalysis> {
        if let Some(id) = youtube_video_id(url) {
            info!(video = %id, "Starting analysis run");
        }

        let workdir = self.temp_root.join(format!("run-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&workdir)?;

        let result = self.analyze_in(url, &workdir).await;

        if let Err(e) = std::fs::remove_dir_all(&workdir) {
            warn!("Failed to clean up working directory: {}", e);
        }

        result
    }

    async fn analyze_in(&self, url: &str, workdir: &Path) -> Result<PodcastAnalysis> {
        info!("Downloading podcast audio");
        let audio_path = self.fetcher.fetch(url, workdir).await?;

        info!("Transcribing audio");
        let transcript = self.transcriber.transcribe(&audio_path).await?;
        info!(
            "Transcription complete ({} segments, {} chars)",
            transcript.segments.len(),
            transcript.text.chars().count()
        );

        let excerpt = transcript.clipped_text(self.settings.pipeline.transcript_cutoff_chars);

        info!("Running insight pipeline");
        let pipeline = podcast_pipeline(
            self.client.clone(),
            self.store.clone(),
            &excerpt,
            &self.settings.pipeline,
            self.settings.weaviate.query_limit,
        );
        let run = pipeline.run().await?;

        let insights = run
            .outputs
            .first()
            .map(|o| o.content.clone())
            .unwrap_or_default();
        let recommendations = run.final_output().to_string();

        Ok(PodcastAnalysis {
            insights,
            recommendations,
        })
    }
}

/// Result of analyzing one podcast episode.
#[derive(Debug, Clone, Serialize)]
pub struct PodcastAnalysis {
    /// Categorized insights extracted from the transcript.
    pub insights: String,
    /// Recommended resources related to those insights.
    pub recommendations: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InnsiktError;
    use crate::transcription::{Transcript, TranscriptSegment};
    use crate::vector_store::MemoryInsightStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingFetcher;

    #[async_trait]
    impl AudioFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str, _workdir: &Path) -> Result<PathBuf> {
            Err(InnsiktError::AudioDownload(
                "Simulated download failure".to_string(),
            ))
        }
    }

    struct CountingTranscriber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcriber for CountingTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Transcript::new(vec![TranscriptSegment {
                start_seconds: 0.0,
                end_seconds: 1.0,
                text: "hello".to_string(),
            }]))
        }
    }

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.general.temp_dir = std::env::temp_dir()
            .join(format!("innsikt-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        settings
    }

    #[tokio::test]
    async fn test_download_failure_short_circuits() {
        let transcriber = Arc::new(CountingTranscriber {
            calls: AtomicUsize::new(0),
        });

        let orchestrator = Orchestrator::with_components(
            test_settings(),
            Arc::new(FailingFetcher),
            transcriber.clone(),
            Arc::new(MemoryInsightStore::new()),
            create_client(),
        )
        .unwrap();

        let result = orchestrator
            .analyze("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await;

        assert!(matches!(result, Err(InnsiktError::AudioDownload(_))));
        // The transcriber must never run when the download fails.
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_directories_are_unique() {
        let orchestrator = Orchestrator::with_components(
            test_settings(),
            Arc::new(FailingFetcher),
            Arc::new(CountingTranscriber {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(MemoryInsightStore::new()),
            create_client(),
        )
        .unwrap();

        // Both runs fail at download, but each one must have created and
        // removed its own directory without touching the other's.
        let _ = orchestrator.analyze("https://youtu.be/a").await;
        let _ = orchestrator.analyze("https://youtu.be/b").await;

        let leftover = std::fs::read_dir(&orchestrator.temp_root)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }
}

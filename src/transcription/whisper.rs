//! Whisper-backed transcription over the hosted OpenAI audio API.

use super::{Transcriber, Transcript, TranscriptSegment};
use crate::audio::split_audio;
use crate::config::TranscriptionSettings;
use crate::error::{InnsiktError, Result};
use crate::openai::OpenAIClient;
use async_openai::types::{
    AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs,
    CreateTranscriptionResponseVerboseJson,
};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Transcriber that uploads audio to the Whisper API.
///
/// Holds a clone of the process-wide OpenAI client, so constructing one per
/// run costs nothing.
pub struct WhisperTranscriber {
    client: OpenAIClient,
    model: String,
    chunk_duration_seconds: u32,
}

impl WhisperTranscriber {
    pub fn new(client: OpenAIClient, settings: &TranscriptionSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            chunk_duration_seconds: settings.chunk_duration_seconds,
        }
    }

    /// Upload one audio file and return its transcript segments.
    #[instrument(skip(self), fields(file = %path.display()))]
    async fn transcribe_file(&self, path: &Path) -> Result<Vec<TranscriptSegment>> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name, bytes))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson)
            .build()
            .map_err(|e| InnsiktError::Transcription(format!("request build: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| InnsiktError::OpenAI(format!("Whisper API error: {}", e)))?;

        let segments = segments_from(response);
        debug!("Received {} segments", segments.len());
        Ok(segments)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    /// Transcribe a file, cutting long audio into chunks first.
    ///
    /// Chunks go up one at a time, so a run stays single-flight end to end
    /// and segment order follows playback order by construction.
    #[instrument(skip(self), fields(file = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let chunk_dir = tempfile::tempdir()?;
        let chunks = split_audio(audio_path, chunk_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            return Ok(Transcript::new(self.transcribe_file(audio_path).await?));
        }

        info!("Transcribing {} chunks with {}", chunks.len(), self.model);

        let mut segments = Vec::new();
        for (index, (chunk_path, offset)) in chunks.iter().enumerate() {
            let chunk_segments = self.transcribe_file(chunk_path).await.map_err(|e| {
                InnsiktError::Transcription(format!("chunk {} at {:.0}s: {}", index, offset, e))
            })?;

            segments.extend(
                chunk_segments
                    .into_iter()
                    .map(|segment| segment.shifted_by(*offset)),
            );
        }

        Ok(Transcript::new(segments))
    }
}

/// Convert a verbose-JSON response into transcript segments.
///
/// Responses without segment timings collapse into one segment spanning the
/// whole file.
fn segments_from(response: CreateTranscriptionResponseVerboseJson) -> Vec<TranscriptSegment> {
    match response.segments {
        Some(segments) if !segments.is_empty() => segments
            .into_iter()
            .map(|s| TranscriptSegment::new(s.start as f64, s.end as f64, s.text.trim().to_string()))
            .collect(),
        _ => vec![TranscriptSegment::new(
            0.0,
            response.duration as f64,
            response.text.trim().to_string(),
        )],
    }
}

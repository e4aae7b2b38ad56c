//! Transcription module for Innsikt.
//!
//! Converts a local audio file into transcript text using the hosted Whisper
//! speech-to-text API.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything that can turn an audio file into a [`Transcript`].
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

/// A complete transcript.
///
/// Downstream stages consume only `text`; the segment timings are carried for
/// diagnostics and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// All segment text joined with spaces, in playback order.
    pub text: String,
    /// The timed segments the text was assembled from.
    pub segments: Vec<TranscriptSegment>,
    /// End timestamp of the last segment.
    pub duration_seconds: f64,
}

impl Transcript {
    /// Assemble a transcript from ordered segments.
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let duration_seconds = segments.last().map(|s| s.end_seconds).unwrap_or(0.0);

        Self {
            text,
            segments,
            duration_seconds,
        }
    }

    /// The first `max_chars` characters of the transcript text.
    ///
    /// Counts characters, not bytes, so multi-byte text never splits inside
    /// a code point.
    pub fn clipped_text(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

/// One timed span of transcribed speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_seconds: f64, end_seconds: f64, text: String) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text,
        }
    }

    /// The same segment moved later by `offset` seconds.
    ///
    /// Chunked transcriptions use this to map chunk-local timestamps back
    /// onto the original file's timeline.
    pub fn shifted_by(self, offset: f64) -> Self {
        Self {
            start_seconds: self.start_seconds + offset,
            end_seconds: self.end_seconds + offset,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_join_with_spaces() {
        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0.0, 4.5, "Welcome back to the show.".to_string()),
            TranscriptSegment::new(4.5, 9.0, "Today we talk funding.".to_string()),
        ]);

        assert_eq!(
            transcript.text,
            "Welcome back to the show. Today we talk funding."
        );
        assert_eq!(transcript.duration_seconds, 9.0);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new(vec![]);

        assert_eq!(transcript.text, "");
        assert_eq!(transcript.duration_seconds, 0.0);
    }

    #[test]
    fn test_clipped_text_counts_chars() {
        let transcript = Transcript::new(vec![TranscriptSegment::new(
            0.0,
            1.0,
            "a".repeat(5000),
        )]);

        assert_eq!(transcript.clipped_text(3000).chars().count(), 3000);
        assert_eq!(transcript.clipped_text(10_000).chars().count(), 5000);
    }

    #[test]
    fn test_clipped_text_multibyte() {
        let transcript = Transcript::new(vec![TranscriptSegment::new(
            0.0,
            1.0,
            "æøå".repeat(10),
        )]);

        let clipped = transcript.clipped_text(4);
        assert_eq!(clipped, "æøåæ");
    }

    #[test]
    fn test_shifted_by_moves_both_timestamps() {
        let segment = TranscriptSegment::new(2.0, 5.0, "later".to_string()).shifted_by(600.0);

        assert_eq!(segment.start_seconds, 602.0);
        assert_eq!(segment.end_seconds, 605.0);
        assert_eq!(segment.text, "later");
    }
}

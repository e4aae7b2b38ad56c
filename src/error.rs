//! Error types for Innsikt.

use thiserror::Error;

/// Everything that can go wrong during an analysis run.
///
/// The first four variants map onto the stages of the pipeline, so a caller
/// can tell which stage died from the variant alone. The rest is ambient
/// plumbing, with conversions for the error types the stages bubble up.
#[derive(Error, Debug)]
pub enum InnsiktError {
    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("{0} not found. Install it and make sure it is on your PATH")]
    ToolNotFound(String),

    #[error("External tool error: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InnsiktError>;

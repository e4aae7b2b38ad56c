//! Configuration module for Innsikt.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DownloadSettings, GeneralSettings, PipelineSettings, ServerSettings, Settings,
    TelemetrySettings, TranscriptionSettings, WeaviateSettings,
};

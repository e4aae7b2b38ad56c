//! Innsikt - Podcast to Startup Insights
//!
//! Point Innsikt at a YouTube podcast episode and it returns categorized
//! startup insights plus resource recommendations, served through a small
//! web page. The name is Norwegian for "insight."
//!
//! A run moves through four stages:
//!
//! 1. [`audio`] downloads the episode with yt-dlp and normalizes it to MP3
//! 2. [`transcription`] turns the audio into text via the Whisper API,
//!    splitting long files into chunks first
//! 3. [`pipeline`] executes two LLM agents in sequence: an extractor that
//!    pulls insights out of the transcript, and a recommender that enriches
//!    them with semantic search against the [`vector_store`]
//! 4. [`web`] renders the combined output in the browser
//!
//! [`orchestrator`] wires the stages together; [`config`] and [`cli`] cover
//! settings and the command-line entry points.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! use innsikt::config::Settings;
//! use innsikt::orchestrator::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(Settings::load()?)?;
//! let analysis = orchestrator
//!     .analyze("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!     .await?;
//! println!("{}", analysis.recommendations);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod pipeline;
pub mod transcription;
pub mod vector_store;
pub mod web;

pub use error::{InnsiktError, Result};

//! Command-line interface for Innsikt.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Innsikt - Podcast to Startup Insights
///
/// Downloads a podcast episode from YouTube, transcribes it, and runs a
/// two-agent pipeline that extracts startup insights and recommends related
/// resources via semantic search. The name is Norwegian for "insight."
#[derive(Parser, Debug)]
#[command(name = "innsikt", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check external tools, API keys, and configuration
    Doctor,

    /// Create the Weaviate insight collection and seed it with starter rows
    Setup,

    /// Start the web UI and HTTP API server
    Serve {
        /// Bind host, overriding the configured one
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
}

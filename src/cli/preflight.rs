//! Pre-flight checks before expensive operations.
//!
//! Commands call these up front so that a missing binary or API key fails at
//! the start rather than minutes into a run.

use crate::config::Settings;
use crate::error::{InnsiktError, Result};
use std::process::Command;

/// What a command is about to do, which decides what to verify.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Full analysis: needs the download tools on top of the API stack.
    Analyze,
    /// Collection provisioning: only the API stack.
    Setup,
}

impl Operation {
    fn required_binaries(self) -> &'static [&'static str] {
        match self {
            Operation::Analyze => &["yt-dlp", "ffmpeg", "ffprobe"],
            Operation::Setup => &[],
        }
    }
}

/// Verify everything `operation` needs, stopping at the first gap.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    require_openai_key()?;
    for binary in operation.required_binaries() {
        require_binary(binary)?;
    }
    settings.weaviate.validate()
}

fn require_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(InnsiktError::Config(
            "OPENAI_API_KEY is not set. Export it before running Innsikt.".to_string(),
        )),
    }
}

fn require_binary(name: &str) -> Result<()> {
    // ffmpeg and ffprobe only understand the single-dash form
    let flag = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };

    match Command::new(name).arg(flag).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(InnsiktError::ToolFailed(format!(
            "{} is installed but did not run cleanly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(InnsiktError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(InnsiktError::ToolFailed(format!("{}: {}", name, e))),
    }
}

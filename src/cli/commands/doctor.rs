//! Doctor command - diagnose the host environment before a run.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Health {
    Pass,
    Warn,
    Fail,
}

/// One line of the doctor report.
#[derive(Debug)]
pub struct Diagnostic {
    label: String,
    health: Health,
    detail: String,
    fix: Option<String>,
}

impl Diagnostic {
    fn pass(label: &str, detail: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            health: Health::Pass,
            detail: detail.into(),
            fix: None,
        }
    }

    fn warn(label: &str, detail: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            health: Health::Warn,
            detail: detail.into(),
            fix: Some(fix.into()),
        }
    }

    fn fail(label: &str, detail: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            health: Health::Fail,
            detail: detail.into(),
            fix: Some(fix.into()),
        }
    }

    fn render(&self) {
        let mark = match self.health {
            Health::Pass => style("✓").green(),
            Health::Warn => style("!").yellow(),
            Health::Fail => style("✗").red(),
        };
        println!("  {} {}  {}", mark, style(&self.label).bold(), self.detail);
        if let Some(fix) = &self.fix {
            println!("      {}", style(fix).dim());
        }
    }
}

/// Probe tools, keys, and configuration, then report. Exits nonzero when any
/// probe fails outright.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Innsikt Doctor");
    println!();

    let report = build_report(settings);
    for (section, diagnostics) in &report {
        println!("{}", style(*section).bold());
        for diagnostic in diagnostics {
            diagnostic.render();
        }
        println!();
    }

    let tally = |health: Health| {
        report
            .iter()
            .flat_map(|(_, diagnostics)| diagnostics)
            .filter(|d| d.health == health)
            .count()
    };
    let failures = tally(Health::Fail);
    let warnings = tally(Health::Warn);

    if failures > 0 {
        Output::error(&format!(
            "{} problem(s) need fixing before Innsikt can run.",
            failures
        ));
        std::process::exit(1);
    }

    if warnings > 0 {
        Output::warning(&format!("Ready, with {} warning(s).", warnings));
    } else {
        Output::success("Everything looks good.");
    }
    Ok(())
}

fn build_report(settings: &Settings) -> Vec<(&'static str, Vec<Diagnostic>)> {
    vec![
        (
            "External tools",
            vec![
                probe_binary("yt-dlp", &["--version"], ytdlp_hint()),
                probe_binary("ffmpeg", &["-version"], ffmpeg_hint()),
                probe_binary("ffprobe", &["-version"], ffmpeg_hint()),
            ],
        ),
        (
            "API configuration",
            vec![
                probe_openai_key(),
                probe_weaviate_cluster(settings),
                probe_weaviate_key(settings),
                probe_telemetry_key(settings),
            ],
        ),
        ("Storage", vec![probe_temp_dir(settings)]),
        ("Configuration", vec![probe_config_file()]),
    ]
}

fn probe_binary(name: &'static str, args: &[&str], hint: &'static str) -> Diagnostic {
    let output = match Command::new(name).args(args).output() {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Diagnostic::fail(name, "not found", hint);
        }
        Err(e) => return Diagnostic::fail(name, format!("could not run: {}", e), hint),
    };

    if !output.status.success() {
        return Diagnostic::fail(name, "installed but not working", hint);
    }

    let banner = String::from_utf8_lossy(&output.stdout);
    let version: String = banner
        .lines()
        .next()
        .unwrap_or("installed")
        .trim()
        .chars()
        .take(48)
        .collect();
    Diagnostic::pass(name, version)
}

fn probe_openai_key() -> Diagnostic {
    const FIX: &str = "export OPENAI_API_KEY='sk-...'";
    match std::env::var("OPENAI_API_KEY") {
        Err(_) => Diagnostic::fail("OPENAI_API_KEY", "not set", FIX),
        Ok(key) if key.is_empty() => Diagnostic::fail("OPENAI_API_KEY", "empty", FIX),
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let prefix: String = key.chars().take(7).collect();
            Diagnostic::pass("OPENAI_API_KEY", format!("configured ({}...)", prefix))
        }
        Ok(_) => Diagnostic::warn(
            "OPENAI_API_KEY",
            "set, but the format looks unusual",
            "OpenAI keys start with sk-",
        ),
    }
}

fn probe_weaviate_cluster(settings: &Settings) -> Diagnostic {
    match settings.weaviate.validate() {
        Ok(()) => Diagnostic::pass("Weaviate cluster", settings.weaviate.cluster_url.clone()),
        Err(e) => Diagnostic::fail(
            "Weaviate cluster",
            e.to_string(),
            "Set weaviate.cluster_url in config.toml or export WEAVIATE_CLUSTER_URL",
        ),
    }
}

fn probe_weaviate_key(settings: &Settings) -> Diagnostic {
    match settings.weaviate.api_key.as_deref() {
        Some(key) if !key.is_empty() => Diagnostic::pass("WEAVIATE_API_KEY", "configured"),
        _ => Diagnostic::warn(
            "WEAVIATE_API_KEY",
            "not set",
            "Hosted clusters need it: export WEAVIATE_API_KEY='...'",
        ),
    }
}

fn probe_telemetry_key(settings: &Settings) -> Diagnostic {
    match settings.telemetry.api_key.as_deref() {
        Some(key) if !key.is_empty() => Diagnostic::pass("OPIK_API_KEY", "configured"),
        _ => Diagnostic::pass("OPIK_API_KEY", "not set (optional)"),
    }
}

fn probe_temp_dir(settings: &Settings) -> Diagnostic {
    let dir = settings.temp_dir();
    if dir.exists() {
        Diagnostic::pass("Temp directory", dir.display().to_string())
    } else {
        Diagnostic::warn(
            "Temp directory",
            format!("{} does not exist yet", dir.display()),
            "Created automatically on the first run",
        )
    }
}

fn probe_config_file() -> Diagnostic {
    let path = Settings::default_config_path();
    if path.exists() {
        Diagnostic::pass("Config file", path.display().to_string())
    } else {
        Diagnostic::warn(
            "Config file",
            "not present, using defaults",
            format!("Create {} to override them", path.display()),
        )
    }
}

fn ytdlp_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "pip install yt-dlp, or use your package manager"
    } else {
        "https://github.com/yt-dlp/yt-dlp"
    }
}

fn ffmpeg_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "sudo apt install ffmpeg, or use your package manager"
    } else {
        "https://ffmpeg.org/download.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_carries_no_fix() {
        let diagnostic = Diagnostic::pass("thing", "fine");
        assert_eq!(diagnostic.health, Health::Pass);
        assert!(diagnostic.fix.is_none());
    }

    #[test]
    fn test_fail_carries_a_fix() {
        let diagnostic = Diagnostic::fail("thing", "broken", "repair it");
        assert_eq!(diagnostic.health, Health::Fail);
        assert_eq!(diagnostic.fix.as_deref(), Some("repair it"));
    }

    #[test]
    fn test_unconfigured_cluster_fails_the_probe() {
        let settings = Settings::default();
        assert_eq!(probe_weaviate_cluster(&settings).health, Health::Fail);
    }

    #[test]
    fn test_telemetry_key_is_optional() {
        let settings = Settings::default();
        assert_eq!(probe_telemetry_key(&settings).health, Health::Pass);
    }
}

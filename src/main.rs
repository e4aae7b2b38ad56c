//! Innsikt CLI entry point.

use clap::Parser;
use innsikt::cli::{commands, Cli, Commands};
use innsikt::config::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match cli.config.as_deref() {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    init_tracing(cli.verbose, &settings.general.log_level);

    // Per-run subdirectories live under this root
    std::fs::create_dir_all(settings.temp_dir())?;

    match cli.command {
        Commands::Doctor => commands::run_doctor(&settings)?,
        Commands::Setup => commands::run_setup(settings).await?,
        Commands::Serve { host, port } => commands::run_serve(host, port, settings).await?,
    }

    Ok(())
}

/// Wire up tracing. `-v` flags trump the configured level, and `RUST_LOG`
/// trumps both.
fn init_tracing(verbose: u8, configured_level: &str) {
    let level = match verbose {
        0 => configured_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("innsikt={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

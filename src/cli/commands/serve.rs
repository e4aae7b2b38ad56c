//! Serve command - run the web UI and HTTP API server.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::web::{self, AppState};
use std::sync::Arc;

/// Run the web server until interrupted.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    // Tool problems surface per-run; warn up front instead of refusing to
    // start. Configuration problems still fail below when the orchestrator
    // is built.
    if let Err(e) = preflight::check(preflight::Operation::Analyze, &settings) {
        Output::warning(&format!("Preflight: {}", e));
        Output::warning("Analysis requests may fail until this is fixed.");
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let state = Arc::new(AppState::new(orchestrator));

    Output::header("Innsikt");
    println!();
    Output::success(&format!("Web UI on http://{}:{}", host, port));
    println!();
    println!("Endpoints:");
    Output::kv("Web UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Analyze", "POST /analyze");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    web::run_server(&host, port, state).await?;

    Ok(())
}

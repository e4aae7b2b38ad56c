//! Terminal output helpers shared by the CLI commands.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Namespace for consistent CLI formatting. Status lines go to stdout,
/// warnings and errors to stderr.
pub struct Output;

impl Output {
    pub fn header(msg: &str) {
        println!();
        println!("{}", style(msg).cyan().bold());
    }

    pub fn info(msg: &str) {
        println!("{} {}", style("::").cyan().bold(), msg);
    }

    pub fn success(msg: &str) {
        println!("{} {}", style("✓").green().bold(), msg);
    }

    pub fn warning(msg: &str) {
        eprintln!("{} {}", style("!").yellow().bold(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), msg);
    }

    /// Indented `key: value` line for summaries.
    pub fn kv(key: &str, value: &str) {
        println!("  {} {}", style(format!("{}:", key)).dim(), value);
    }

    pub fn list_item(msg: &str) {
        println!("  {} {}", style("-").dim(), msg);
    }

    /// Spinner for operations without a known length.
    pub fn spinner(msg: &str) -> ProgressBar {
        let spinner_style =
            ProgressStyle::with_template("{spinner:.cyan} {msg}").expect("static spinner template");

        let pb = ProgressBar::new_spinner()
            .with_style(spinner_style)
            .with_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

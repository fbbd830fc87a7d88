//! One-shot service calls: `gitsense results` and `gitsense health`.

use anyhow::{Context, Result};
use console::style;

use gitsense::client::{AnalysisBackend, HttpBackend};
use gitsense::config::Config;
use gitsense::ui::icons::{CHECK, HOURGLASS};

use super::{OutputMode, ViewSelection, print_document};

pub async fn cmd_results(
    config: &Config,
    repo_id: &str,
    selection: ViewSelection,
    output: OutputMode,
) -> Result<()> {
    let backend = HttpBackend::new(config.base_url());
    let document = backend
        .fetch_results(repo_id)
        .await
        .with_context(|| format!("Failed to fetch results for '{}'", repo_id))?;

    if output == OutputMode::Text {
        let icon = if document.status.is_terminal() { CHECK } else { HOURGLASS };
        println!(
            "{}{} {}",
            icon,
            style(repo_id).cyan().bold(),
            style(format!("({})", document.status)).dim()
        );
        println!();
    }

    print_document(Some(&document), selection, output)
}

pub async fn cmd_health(config: &Config) -> Result<()> {
    let backend = HttpBackend::new(config.base_url());
    let health = backend
        .health()
        .await
        .with_context(|| format!("Analysis service at {} is unreachable", backend.base_url()))?;

    println!(
        "{}Analysis service at {} is {}",
        CHECK,
        style(backend.base_url()).cyan(),
        style(&health.status).green().bold()
    );
    Ok(())
}

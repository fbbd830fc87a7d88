//! Submit a repository and follow the analysis: `gitsense analyze`.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use tracing::debug;

use gitsense::client::HttpBackend;
use gitsense::config::Config;
use gitsense::render::View;
use gitsense::session::{Outcome, SessionController, SessionPhase, SessionSnapshot};
use gitsense::submit::{Submission, SubmissionControl};
use gitsense::ui::SessionUI;

use super::{OutputMode, ViewSelection, print_document};

pub struct AnalyzeOptions {
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub view: ViewSelection,
    pub output: OutputMode,
    pub interactive: bool,
    pub verbose: bool,
}

pub async fn cmd_analyze(config: &Config, opts: AnalyzeOptions) -> Result<()> {
    let backend = HttpBackend::new(config.base_url()).with_branch(opts.branch.clone());
    let mut controller = SessionController::new(Arc::new(backend), config.poll_settings());
    let mut control = SubmissionControl::new();

    let mut locator_input = match &opts.repo_url {
        Some(url) => url.clone(),
        None => prompt_locator()?,
    };

    loop {
        control.set_locator(locator_input);
        let locator = match control.trigger(|l| debug!(locator = l, "submission accepted")) {
            Submission::Accepted(locator) => locator,
            Submission::Empty => bail!("Repository URL is empty"),
            Submission::Busy => bail!("An analysis is already running"),
        };

        control.set_busy(true);
        let snapshot = follow_session(&mut controller, &locator, &opts).await;
        control.set_busy(false);
        let snapshot = snapshot?;

        if let SessionPhase::Done(Outcome::Failed) = snapshot.phase {
            let message = snapshot
                .error
                .unwrap_or_else(|| "Analysis failed.".to_string());
            bail!(message);
        }

        if !opts.interactive || opts.output == OutputMode::Json {
            return print_document(snapshot.document.as_ref(), opts.view, opts.output);
        }

        match browse_views(&snapshot, opts.view)? {
            Some(next) => locator_input = next,
            None => return Ok(()),
        }
    }
}

fn prompt_locator() -> Result<String> {
    Input::new()
        .with_prompt("Repository URL")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read repository URL")
}

/// Start the session and keep the progress UI in sync until it finishes.
async fn follow_session(
    controller: &mut SessionController,
    locator: &str,
    opts: &AnalyzeOptions,
) -> Result<SessionSnapshot> {
    let ui = SessionUI::new(locator, opts.verbose);
    let mut rx = controller.subscribe();

    tokio::select! {
        _ = controller.start_analysis(locator) => {}
        _ = tokio::signal::ctrl_c() => return Err(interrupt(controller, &ui)),
    }
    if controller.snapshot().phase == SessionPhase::Polling {
        ui.waiting_hint();
    }

    let snapshot = loop {
        let snapshot = rx.borrow_and_update().clone();
        ui.update(&snapshot);
        if snapshot.phase.is_done() {
            break snapshot;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break controller.snapshot();
                }
            }
            _ = tokio::signal::ctrl_c() => return Err(interrupt(controller, &ui)),
        }
    };

    match (snapshot.phase, opts.output) {
        (_, OutputMode::Json) => ui.clear(),
        (SessionPhase::Done(Outcome::Completed), _) => ui.finish_completed(),
        _ => ui.finish_failed(snapshot.error.as_deref().unwrap_or("Analysis failed.")),
    }
    Ok(snapshot)
}

/// Abandon the running session after Ctrl-C.
fn interrupt(controller: &mut SessionController, ui: &SessionUI) -> anyhow::Error {
    controller.reset();
    ui.finish_failed("Interrupted");
    anyhow!("Analysis interrupted")
}

/// Tab bar: print views on demand. Returns a new locator when the user asks
/// to analyze another repository.
fn browse_views(snapshot: &SessionSnapshot, initial: ViewSelection) -> Result<Option<String>> {
    let mut items: Vec<String> = View::ALL.iter().map(|v| v.label().to_string()).collect();
    let analyze_another = items.len();
    items.push("Analyze another repository".to_string());
    items.push("Quit".to_string());

    print_document(snapshot.document.as_ref(), initial, OutputMode::Text)?;
    let mut default = match initial {
        ViewSelection::One(view) => View::ALL.iter().position(|v| *v == view).unwrap_or(0),
        ViewSelection::All => 0,
    };

    loop {
        println!();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("View")
            .items(&items)
            .default(default)
            .interact_opt()
            .context("Failed to read view selection")?;

        match selection {
            Some(i) if i < View::ALL.len() => {
                default = i;
                println!();
                print_document(
                    snapshot.document.as_ref(),
                    ViewSelection::One(View::ALL[i]),
                    OutputMode::Text,
                )?;
            }
            Some(i) if i == analyze_another => {
                println!("{}", style("Starting a new analysis").dim());
                return prompt_locator().map(Some);
            }
            // "Quit" or Esc
            _ => return Ok(None),
        }
    }
}

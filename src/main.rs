use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gitsense::config::Config;

mod cmd;

#[derive(Parser)]
#[command(name = "gitsense")]
#[command(version, about = "Analyze a Git repository with the Git Sense service")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to gitsense.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis service. Overrides config and GITSENSE_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Milliseconds between status polls. Overrides config and GITSENSE_POLL_INTERVAL_MS.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a repository for analysis and watch the results arrive
    Analyze {
        /// Repository URL. Prompted for when omitted.
        repo_url: Option<String>,

        /// Branch to analyze (the service auto-detects when omitted)
        #[arg(long)]
        branch: Option<String>,

        /// View to print: overview, structure, files, bugs, suggestions, commits, readme, all
        #[arg(long)]
        view: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        output: String,

        /// Pick views interactively after the analysis finishes
        #[arg(short, long)]
        interactive: bool,
    },
    /// Fetch and print the current results of an analysis without polling
    Results {
        /// Session id returned when the analysis was started
        repo_id: String,

        /// View to print: overview, structure, files, bugs, suggestions, commits, readme, all
        #[arg(long)]
        view: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        output: String,
    },
    /// Check that the analysis service is reachable
    Health,
    /// View, validate or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default gitsense.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    gitsense::logging::init(cli.verbose, cli.log_json);

    match &cli.command {
        Commands::Analyze {
            repo_url,
            branch,
            view,
            output,
            interactive,
        } => {
            let config = load_config(&cli)?;
            let opts = cmd::AnalyzeOptions {
                repo_url: repo_url.clone(),
                branch: branch.clone(),
                view: cmd::ViewSelection::resolve(view.as_deref(), &config)?,
                output: output.parse()?,
                interactive: *interactive,
                verbose: cli.verbose,
            };
            cmd::cmd_analyze(&config, opts).await?;
        }
        Commands::Results {
            repo_id,
            view,
            output,
        } => {
            let config = load_config(&cli)?;
            let selection = cmd::ViewSelection::resolve(view.as_deref(), &config)?;
            cmd::cmd_results(&config, repo_id, selection, output.parse()?).await?;
        }
        Commands::Health => cmd::cmd_health(&load_config(&cli)?).await?,
        Commands::Config { command } => {
            cmd::cmd_config(cli.config.as_deref(), command.clone(), || load_config(&cli))?
        }
    }

    Ok(())
}

/// Effective configuration: file, then environment, then global flags.
fn load_config(cli: &Cli) -> Result<Config> {
    Ok(Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(cli.base_url.clone(), cli.poll_interval_ms))
}

//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled      |
//! |------------|-----------------------|
//! | `analyze`  | `Analyze`             |
//! | `service`  | `Results`, `Health`   |
//! | `config`   | `Config`              |

pub mod analyze;
pub mod config;
pub mod service;

pub use analyze::{AnalyzeOptions, cmd_analyze};
pub use config::cmd_config;
pub use service::{cmd_health, cmd_results};

use anyhow::Result;
use gitsense::config::Config;
use gitsense::document::AnalysisDocument;
use gitsense::render::{View, render, render_all};
use gitsense::ui::{paint, terminal_width};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Styled, word-wrapped views
    #[default]
    Text,
    /// The raw result document
    Json,
}

impl std::str::FromStr for OutputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Invalid output format '{}'. Valid values: text, json", s),
        }
    }
}

/// Which views to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSelection {
    One(View),
    All,
}

impl ViewSelection {
    /// `--view` when given, else the configured default view.
    pub fn resolve(flag: Option<&str>, config: &Config) -> Result<Self> {
        match flag {
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(s) => Ok(Self::One(s.parse()?)),
            None => Ok(Self::One(config.default_view())),
        }
    }
}

/// Print a document according to the selected views and output mode.
pub fn print_document(
    document: Option<&AnalysisDocument>,
    selection: ViewSelection,
    output: OutputMode,
) -> Result<()> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputMode::Text => {
            let width = terminal_width();
            let panels = match selection {
                ViewSelection::One(view) => vec![render(document, view)],
                ViewSelection::All => render_all(document),
            };
            for panel in &panels {
                print!("{}", paint(panel, width));
            }
        }
    }
    Ok(())
}

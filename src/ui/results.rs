//! Paints a rendered [`Panel`] as styled terminal text.

use crate::document::SeverityTier;
use crate::render::{Block, Panel};
use crate::ui::icons::{BUG, BULB, COMMIT, FILE, HOURGLASS, STATS};
use console::style;
use std::fmt::Write;

const FALLBACK_WIDTH: usize = 100;
const MIN_WIDTH: usize = 40;

/// Current terminal width, or a sane default when not attached to a terminal.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(FALLBACK_WIDTH)
        .max(MIN_WIDTH)
}

/// Paint a panel, wrapping prose to `width` columns.
pub fn paint(panel: &Panel, width: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let mut out = String::new();

    let title = panel.title();
    let _ = writeln!(out, "{}", style(title).bold().underlined());
    let _ = writeln!(out);

    for block in &panel.blocks {
        paint_block(&mut out, block, width);
    }
    out
}

fn paint_block(out: &mut String, block: &Block, width: usize) {
    match block {
        Block::Heading(text) => {
            let _ = writeln!(out, "{}", style(text).bold());
        }
        Block::Loading => {
            let _ = writeln!(out, "  {}{}", HOURGLASS, style("Analyzing...").dim());
            let _ = writeln!(out);
        }
        Block::Stats(stats) => {
            let label_width = stats.iter().map(|s| s.label.len()).max().unwrap_or(0);
            for stat in stats {
                let value = match stat.value {
                    Some(n) => style(n.to_string()).cyan().bold().to_string(),
                    None => style("…").dim().to_string(),
                };
                let _ = writeln!(
                    out,
                    "  {}{:<w$}  {}",
                    STATS,
                    stat.label,
                    value,
                    w = label_width
                );
            }
            let _ = writeln!(out);
        }
        Block::LatestCommit(commit) => {
            let _ = writeln!(out, "  {}", style(&commit.message).bold());
            let _ = writeln!(
                out,
                "  {} {} {}",
                style(&commit.author).cyan(),
                style("•").dim(),
                style(commit.display_date()).dim()
            );
            let _ = writeln!(out);
        }
        Block::Empty { title, detail } => {
            let _ = writeln!(out, "  {}", style(title).green().bold());
            let _ = writeln!(out, "  {}", style(detail).dim());
            let _ = writeln!(out);
        }
        Block::Prose(text) => {
            let _ = writeln!(out, "{}", wrap(text, width, "  "));
            let _ = writeln!(out);
        }
        Block::FileSummary(file) => {
            let _ = writeln!(out, "  {}{}", FILE, style(&file.file).bold());
            let _ = writeln!(out, "{}", style(wrap(&file.summary, width, "     ")).dim());
            let _ = writeln!(out);
        }
        Block::Issue(bug) => {
            let severity = match bug.tier() {
                SeverityTier::High => style(bug.severity.as_str()).red().bold(),
                SeverityTier::Medium => style(bug.severity.as_str()).yellow().bold(),
                SeverityTier::Low => style(bug.severity.as_str()).blue(),
            };
            let _ = writeln!(
                out,
                "  {}{}  [{}]",
                BUG,
                style(bug.location()).bold(),
                severity
            );
            let _ = writeln!(out, "{}", wrap(&bug.description, width, "     "));
            let _ = writeln!(out);
        }
        Block::Suggestion(item) => {
            let _ = writeln!(out, "  {}{}", BULB, style(&item.file).bold());
            let _ = writeln!(out, "{}", wrap(&item.description, width, "     "));
            for line in item.suggestion.lines() {
                let _ = writeln!(out, "     {} {}", style("│").dim(), style(line).green());
            }
            let _ = writeln!(out);
        }
        Block::Timeline(commits) => {
            for commit in commits {
                let _ = writeln!(out, "  {}{}", COMMIT, style(&commit.message).bold());
                let _ = writeln!(
                    out,
                    "     {} {} {} {} {}",
                    style(&commit.hash).yellow(),
                    style("•").dim(),
                    commit.author,
                    style("•").dim(),
                    style(commit.display_date()).dim()
                );
            }
            let _ = writeln!(out);
        }
    }
}

fn wrap(text: &str, width: usize, indent: &str) -> String {
    let options = textwrap::Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AnalysisDocument, Bug, Commit, Suggestion};
    use crate::render::{View, render};

    fn plain(panel: &Panel) -> String {
        console::strip_ansi_codes(&paint(panel, 80)).to_string()
    }

    #[test]
    fn test_paint_loading_view() {
        let text = plain(&render(None, View::Readme));
        assert!(text.starts_with("README"));
        assert!(text.contains("Analyzing..."));
    }

    #[test]
    fn test_paint_bug_shows_location_and_severity() {
        let doc = AnalysisDocument {
            bugs: Some(vec![Bug {
                file: "src/app.ts".to_string(),
                line: Some(12),
                severity: "High".to_string(),
                description: "Unchecked null dereference".to_string(),
            }]),
            ..Default::default()
        };
        let text = plain(&render(Some(&doc), View::Bugs));
        assert!(text.contains("src/app.ts:12"));
        assert!(text.contains("[High]"));
        assert!(text.contains("Unchecked null dereference"));
    }

    #[test]
    fn test_paint_suggestion_prints_every_replacement_line() {
        let doc = AnalysisDocument {
            suggestions: Some(vec![Suggestion {
                file: "lib.py".to_string(),
                description: "Use a context manager".to_string(),
                suggestion: "with open(p) as f:\n    data = f.read()".to_string(),
            }]),
            ..Default::default()
        };
        let text = plain(&render(Some(&doc), View::Suggestions));
        assert!(text.contains("with open(p) as f:"));
        assert!(text.contains("data = f.read()"));
    }

    #[test]
    fn test_paint_timeline_preserves_order() {
        let commits = ["third", "first", "second"]
            .iter()
            .map(|m| Commit {
                hash: format!("{}00000", &m[..1]),
                message: m.to_string(),
                author: "dev".to_string(),
                date: "2024-01-02T03:04:05+00:00".to_string(),
            })
            .collect();
        let doc = AnalysisDocument {
            commits: Some(commits),
            ..Default::default()
        };
        let text = plain(&render(Some(&doc), View::Commits));
        let third = text.find("third").unwrap();
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(third < first && first < second);
        assert!(text.contains("2024-01-02"));
    }

    #[test]
    fn test_paint_wraps_prose_to_width() {
        let doc = AnalysisDocument {
            structure: Some("word ".repeat(60)),
            ..Default::default()
        };
        let text = paint(&render(Some(&doc), View::Structure), 40);
        let plain = console::strip_ansi_codes(&text).to_string();
        assert!(plain.lines().all(|l| console::measure_text_width(l) <= 40));
        assert!(plain.lines().count() > 5);
    }

    #[test]
    fn test_paint_overview_stats() {
        let doc = AnalysisDocument {
            bugs: Some(vec![Bug::default(), Bug::default()]),
            ..Default::default()
        };
        let text = plain(&render(Some(&doc), View::Overview));
        assert!(text.contains("Quick Stats"));
        assert!(text.contains("Bugs Found"));
        assert!(text.contains("2"));
        assert!(text.contains("…"));
    }
}

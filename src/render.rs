//! Result renderer: maps a document and a selected view to a view tree.
//!
//! Pure and infallible. Any section whose source field is still `None` becomes
//! [`Block::Loading`], so views fill in as the backend finishes jobs in
//! whatever order. Painting the tree to a terminal lives in
//! [`crate::ui::results`].

use crate::document::{AnalysisDocument, Bug, Commit, FileSummary, Suggestion};

/// The named views of the results dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Overview,
    Structure,
    Files,
    Bugs,
    Suggestions,
    Commits,
    Readme,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Overview,
        View::Structure,
        View::Files,
        View::Bugs,
        View::Suggestions,
        View::Commits,
        View::Readme,
    ];

    pub fn id(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::Structure => "structure",
            View::Files => "files",
            View::Bugs => "bugs",
            View::Suggestions => "suggestions",
            View::Commits => "commits",
            View::Readme => "readme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Structure => "Structure",
            View::Files => "File Summaries",
            View::Bugs => "Bugs & Security",
            View::Suggestions => "Suggestions",
            View::Commits => "Commit History",
            View::Readme => "README",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for View {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        View::ALL
            .into_iter()
            .find(|v| v.id() == wanted || v.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let ids: Vec<&str> = View::ALL.iter().map(|v| v.id()).collect();
                anyhow::anyhow!("Invalid view '{}'. Valid values: {}", s, ids.join(", "))
            })
    }
}

/// One overview counter. `None` means the source field is still loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(&'static str),
    /// Section still being produced by the backend.
    Loading,
    Stats(Vec<Stat>),
    LatestCommit(Commit),
    /// Section finished with nothing to show.
    Empty {
        title: &'static str,
        detail: &'static str,
    },
    Prose(String),
    FileSummary(FileSummary),
    Issue(Bug),
    Suggestion(Suggestion),
    Timeline(Vec<Commit>),
}

/// A rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub view: View,
    pub blocks: Vec<Block>,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        self.view.label()
    }

    pub fn is_loading(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Loading))
    }
}

/// Render one view. A missing document renders every section as loading.
pub fn render(document: Option<&AnalysisDocument>, view: View) -> Panel {
    let empty = AnalysisDocument::default();
    let doc = document.unwrap_or(&empty);

    let blocks = match view {
        View::Overview => overview(doc),
        View::Structure => prose(doc.structure.as_deref()),
        View::Files => list(
            doc.file_summaries.as_deref(),
            Block::Empty {
                title: "No Files Summarized",
                detail: "Could not generate summaries for this repository.",
            },
            |f| Block::FileSummary(f.clone()),
        ),
        View::Bugs => list(
            doc.bugs.as_deref(),
            Block::Empty {
                title: "No Bugs Found",
                detail: "Great job! Your code looks clean.",
            },
            |b| Block::Issue(b.clone()),
        ),
        View::Suggestions => list(
            doc.suggestions.as_deref(),
            Block::Empty {
                title: "No Suggestions Found",
                detail: "The code looks good! No major refactoring needed.",
            },
            |s| Block::Suggestion(s.clone()),
        ),
        View::Commits => match doc.commits.as_deref() {
            Some(commits) => vec![Block::Timeline(commits.to_vec())],
            None => vec![Block::Loading],
        },
        View::Readme => prose(doc.readme.as_deref()),
    };

    Panel { view, blocks }
}

/// Render every view in dashboard order.
pub fn render_all(document: Option<&AnalysisDocument>) -> Vec<Panel> {
    View::ALL.into_iter().map(|v| render(document, v)).collect()
}

fn overview(doc: &AnalysisDocument) -> Vec<Block> {
    let stats = vec![
        Stat {
            label: "Bugs Found",
            value: doc.bugs.as_ref().map(Vec::len),
        },
        Stat {
            label: "Suggestions",
            value: doc.suggestions.as_ref().map(Vec::len),
        },
        Stat {
            label: "Recent Commits",
            value: doc.commits.as_ref().map(Vec::len),
        },
        Stat {
            label: "Files Analyzed",
            value: doc.file_summaries.as_ref().map(Vec::len),
        },
    ];

    let mut blocks = vec![
        Block::Heading("Quick Stats"),
        Block::Stats(stats),
        Block::Heading("Latest Commit"),
    ];
    match doc.commits.as_deref() {
        Some([latest, ..]) => blocks.push(Block::LatestCommit(latest.clone())),
        Some([]) => {}
        None => blocks.push(Block::Loading),
    }
    blocks
}

fn prose(text: Option<&str>) -> Vec<Block> {
    match text {
        Some(text) => vec![Block::Prose(text.to_string())],
        None => vec![Block::Loading],
    }
}

fn list<T>(items: Option<&[T]>, empty: Block, each: impl Fn(&T) -> Block) -> Vec<Block> {
    match items {
        None => vec![Block::Loading],
        Some([]) => vec![empty],
        Some(items) => items.iter().map(each).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AnalysisStatus, SeverityTier};

    fn commit(hash: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            message: format!("commit {}", hash),
            author: "dev".to_string(),
            date: "2024-05-01T10:00:00+00:00".to_string(),
        }
    }

    fn stats(panel: &Panel) -> Vec<Stat> {
        panel
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Stats(s) => Some(s.clone()),
                _ => None,
            })
            .expect("overview has stats")
    }

    #[test]
    fn test_missing_document_renders_loading_everywhere() {
        for view in View::ALL {
            let panel = render(None, view);
            assert!(panel.is_loading(), "{} should be loading", view);
        }
    }

    #[test]
    fn test_overview_counts_load_independently_and_never_regress() {
        let mut docs = vec![AnalysisDocument {
            status: AnalysisStatus::Pending,
            ..Default::default()
        }];
        let mut d = AnalysisDocument {
            status: AnalysisStatus::Processing,
            bugs: Some(vec![Bug::default()]),
            ..Default::default()
        };
        docs.push(d.clone());
        d.commits = Some(vec![commit("a"), commit("b")]);
        d.suggestions = Some(Vec::new());
        docs.push(d.clone());
        d.status = AnalysisStatus::Completed;
        d.file_summaries = Some(vec![FileSummary::default(); 3]);
        docs.push(d);

        let mut seen = [false; 4];
        for doc in &docs {
            let s = stats(&render(Some(doc), View::Overview));
            let sources = [
                doc.bugs.is_some(),
                doc.suggestions.is_some(),
                doc.commits.is_some(),
                doc.file_summaries.is_some(),
            ];
            for i in 0..4 {
                assert_eq!(s[i].value.is_some(), sources[i], "{}", s[i].label);
                if seen[i] {
                    assert!(s[i].value.is_some(), "{} regressed", s[i].label);
                }
                seen[i] |= s[i].value.is_some();
            }
        }

        let last = stats(&render(docs.last(), View::Overview));
        let values: Vec<Option<usize>> = last.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![Some(1), Some(0), Some(2), Some(3)]);
    }

    #[test]
    fn test_overview_latest_commit_is_first_received() {
        let doc = AnalysisDocument {
            commits: Some(vec![commit("newest"), commit("older")]),
            ..Default::default()
        };
        let panel = render(Some(&doc), View::Overview);
        assert!(panel.blocks.contains(&Block::LatestCommit(commit("newest"))));
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_overview_with_no_commits_shows_nothing_under_latest() {
        let doc = AnalysisDocument {
            commits: Some(Vec::new()),
            ..Default::default()
        };
        let panel = render(Some(&doc), View::Overview);
        assert_eq!(panel.blocks.last(), Some(&Block::Heading("Latest Commit")));
    }

    #[test]
    fn test_empty_bugs_is_success_state_not_loading() {
        let doc = AnalysisDocument {
            status: AnalysisStatus::Completed,
            bugs: Some(Vec::new()),
            ..Default::default()
        };
        let panel = render(Some(&doc), View::Bugs);
        assert_eq!(
            panel.blocks,
            vec![Block::Empty {
                title: "No Bugs Found",
                detail: "Great job! Your code looks clean.",
            }]
        );
    }

    #[test]
    fn test_uppercase_severity_lands_in_high_tier() {
        let bug = Bug {
            file: "a.ts".to_string(),
            line: Some(10),
            severity: "HIGH".to_string(),
            description: "x".to_string(),
        };
        let doc = AnalysisDocument {
            bugs: Some(vec![bug.clone()]),
            ..Default::default()
        };
        let panel = render(Some(&doc), View::Bugs);
        match &panel.blocks[..] {
            [Block::Issue(b)] => {
                assert_eq!(b, &bug);
                assert_eq!(b.tier(), SeverityTier::High);
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn test_empty_files_distinct_from_loading() {
        let loading = render(None, View::Files);
        assert_eq!(loading.blocks, vec![Block::Loading]);

        let doc = AnalysisDocument {
            file_summaries: Some(Vec::new()),
            ..Default::default()
        };
        let empty = render(Some(&doc), View::Files);
        assert!(matches!(
            empty.blocks[..],
            [Block::Empty {
                title: "No Files Summarized",
                ..
            }]
        ));
    }

    #[test]
    fn test_empty_suggestions_state() {
        let doc = AnalysisDocument {
            suggestions: Some(Vec::new()),
            ..Default::default()
        };
        let panel = render(Some(&doc), View::Suggestions);
        assert!(matches!(
            panel.blocks[..],
            [Block::Empty {
                title: "No Suggestions Found",
                ..
            }]
        ));
    }

    #[test]
    fn test_commit_timeline_keeps_received_order() {
        let orders: [&[&str]; 4] = [
            &["a", "b", "c"],
            &["c", "b", "a"],
            &["b", "c", "a"],
            &["a"],
        ];
        for order in orders {
            let commits: Vec<Commit> = order.iter().map(|h| commit(h)).collect();
            let doc = AnalysisDocument {
                commits: Some(commits.clone()),
                ..Default::default()
            };
            let panel = render(Some(&doc), View::Commits);
            assert_eq!(panel.blocks, vec![Block::Timeline(commits)]);
        }
    }

    #[test]
    fn test_prose_views() {
        let doc = AnalysisDocument {
            structure: Some("src/\n  main.rs".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render(Some(&doc), View::Structure).blocks,
            vec![Block::Prose("src/\n  main.rs".to_string())]
        );
        assert_eq!(render(Some(&doc), View::Readme).blocks, vec![Block::Loading]);
    }

    #[test]
    fn test_render_all_follows_dashboard_order() {
        let panels = render_all(None);
        let titles: Vec<&str> = panels.iter().map(Panel::title).collect();
        assert_eq!(
            titles,
            vec![
                "Overview",
                "Structure",
                "File Summaries",
                "Bugs & Security",
                "Suggestions",
                "Commit History",
                "README"
            ]
        );
    }

    #[test]
    fn test_view_from_str_accepts_ids_and_labels() {
        assert_eq!("bugs".parse::<View>().unwrap(), View::Bugs);
        assert_eq!("Commit History".parse::<View>().unwrap(), View::Commits);
        assert_eq!(" README ".parse::<View>().unwrap(), View::Readme);
        let err = "tabs".parse::<View>().unwrap_err();
        assert!(err.to_string().contains("overview"));
    }
}

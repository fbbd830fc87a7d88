//! Result document returned by the analysis service.
//!
//! The backend fills each section independently as its job finishes, so every
//! section is `Option`: `None` means "not produced yet", `Some` means the
//! producer is done (possibly with an empty list).
//!
//! Parsing is lenient. The backend assembles these payloads from model output,
//! so a malformed entry is dropped or defaulted rather than failing the whole
//! poll.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Backend-reported status of an analysis session.
///
/// Unknown strings are preserved in `Other` and treated as "still running".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
            AnalysisStatus::Other(s) => s,
        }
    }

    /// `completed` and `failed` end polling; nothing else does.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    /// Whether a poll carrying this status should replace the held document.
    pub fn carries_document(&self) -> bool {
        matches!(self, AnalysisStatus::Processing | AnalysisStatus::Completed)
    }
}

impl From<&str> for AnalysisStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => AnalysisStatus::Pending,
            "processing" => AnalysisStatus::Processing,
            "completed" => AnalysisStatus::Completed,
            "failed" => AnalysisStatus::Failed,
            other => AnalysisStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnalysisStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnalysisStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => AnalysisStatus::from(s.as_str()),
            Value::Null => AnalysisStatus::Pending,
            other => AnalysisStatus::Other(other.to_string()),
        })
    }
}

/// A potential bug or security issue flagged by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bug {
    #[serde(deserialize_with = "lenient_string")]
    pub file: String,
    #[serde(deserialize_with = "lenient_line")]
    pub line: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub severity: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

impl Bug {
    pub fn tier(&self) -> SeverityTier {
        SeverityTier::classify(&self.severity)
    }

    /// `file:line`, or just `file` when the line is unknown.
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file, line),
            None => self.file.clone(),
        }
    }
}

/// A refactoring suggestion with replacement text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    #[serde(deserialize_with = "lenient_string")]
    pub file: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub file: String,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "lenient_string")]
    pub hash: String,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    /// ISO-8601 commit timestamp as sent by the backend.
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
}

impl Commit {
    /// Calendar date of the commit, or the raw string if it doesn't parse.
    pub fn display_date(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }
}

/// Display tier for a bug's free-text severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    High,
    Medium,
    /// "low" and anything unrecognised.
    Low,
}

impl SeverityTier {
    pub fn classify(severity: &str) -> Self {
        match severity.trim().to_lowercase().as_str() {
            "high" => SeverityTier::High,
            "medium" => SeverityTier::Medium,
            _ => SeverityTier::Low,
        }
    }
}

/// The independently-produced sections of a result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Bugs,
    Suggestions,
    Readme,
    Structure,
    FileSummaries,
    Commits,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Structure,
        Section::FileSummaries,
        Section::Bugs,
        Section::Suggestions,
        Section::Commits,
        Section::Readme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Bugs => "bugs",
            Section::Suggestions => "suggestions",
            Section::Readme => "readme",
            Section::Structure => "structure",
            Section::FileSummaries => "file summaries",
            Section::Commits => "commits",
        }
    }
}

/// One poll response from `GET /results/{repo_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDocument {
    pub status: AnalysisStatus,
    #[serde(deserialize_with = "lenient_list")]
    pub bugs: Option<Vec<Bug>>,
    #[serde(deserialize_with = "lenient_list")]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(deserialize_with = "lenient_text")]
    pub readme: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub structure: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub file_summaries: Option<Vec<FileSummary>>,
    #[serde(deserialize_with = "lenient_list")]
    pub commits: Option<Vec<Commit>>,
    /// Backend error detail, only present on `failed`.
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisDocument {
    /// Parse a document from raw JSON.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn is_ready(&self, section: Section) -> bool {
        match section {
            Section::Bugs => self.bugs.is_some(),
            Section::Suggestions => self.suggestions.is_some(),
            Section::Readme => self.readme.is_some(),
            Section::Structure => self.structure.is_some(),
            Section::FileSummaries => self.file_summaries.is_some(),
            Section::Commits => self.commits.is_some(),
        }
    }

    pub fn ready_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_ready(*s))
            .collect()
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_line<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Null stays "not produced yet". A non-list value means the producer
/// finished with nothing usable, so it becomes an empty list. Entries that
/// are not objects are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => Some(Vec::new()),
    })
}

//! Session state and its transitions.
//!
//! Everything here is synchronous and side-effect free; the poll loop in
//! [`super::controller`] feeds results in and acts on the returned [`PollStep`].

use serde::Serialize;

use crate::document::{AnalysisDocument, AnalysisStatus};
use crate::errors::BackendError;

pub const START_FAILED: &str = "Failed to start analysis. Please try again.";
pub const FETCH_FAILED: &str = "Failed to fetch analysis results. Please try again.";
pub const ANALYSIS_FAILED: &str =
    "Analysis failed. Please check the repository URL and try again.";
pub const POLLS_EXHAUSTED: &str = "Analysis timed out before the backend finished.";

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Failed,
}

/// Controller lifecycle: `Idle → Starting → Polling → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Starting,
    Polling,
    Done(Outcome),
}

impl SessionPhase {
    pub fn is_done(self) -> bool {
        matches!(self, SessionPhase::Done(_))
    }

    /// A submission is in flight (`Starting` or `Polling`).
    pub fn is_busy(self) -> bool {
        matches!(self, SessionPhase::Starting | SessionPhase::Polling)
    }
}

/// What the poll loop should do after a poll result has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    Stop,
}

/// Everything a renderer needs to know about the current session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Bumped on every new submission or reset. A poll loop only writes while
    /// its generation is current.
    pub generation: u64,
    pub phase: SessionPhase,
    pub locator: Option<String>,
    pub session_id: Option<String>,
    /// Last status reported by the backend.
    pub status: Option<AnalysisStatus>,
    /// Latest document from a `processing`/`completed` poll.
    pub document: Option<AnalysisDocument>,
    /// User-facing failure message.
    pub error: Option<String>,
    pub polls: u32,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: SessionPhase::Idle,
            locator: None,
            session_id: None,
            status: None,
            document: None,
            error: None,
            polls: 0,
        }
    }
}

impl SessionSnapshot {
    /// Drop the current session and return to `Idle` under a new generation.
    pub fn reset(&mut self, generation: u64) {
        *self = SessionSnapshot {
            generation,
            ..SessionSnapshot::default()
        };
    }

    /// `Idle/Done → Starting`: discard the previous session entirely.
    pub fn begin(&mut self, generation: u64, locator: &str) {
        self.reset(generation);
        self.phase = SessionPhase::Starting;
        self.locator = Some(locator.to_string());
    }

    /// `Starting → Polling`.
    pub fn started(&mut self, session_id: String) {
        self.session_id = Some(session_id);
        self.phase = SessionPhase::Polling;
    }

    /// `Starting → Done(Failed)`. No retry.
    pub fn start_failed(&mut self) {
        self.fail(START_FAILED);
    }

    /// Apply one poll result.
    ///
    /// `processing`/`completed` replace the document wholesale, `completed`
    /// and `failed` end the session, and any other status (including
    /// unknown ones) just keeps polling. A transport failure is terminal.
    pub fn apply_poll(
        &mut self,
        result: Result<AnalysisDocument, BackendError>,
        max_polls: Option<u32>,
    ) -> PollStep {
        if self.phase != SessionPhase::Polling {
            return PollStep::Stop;
        }
        self.polls = self.polls.saturating_add(1);

        let document = match result {
            Ok(document) => document,
            Err(_) => {
                self.fail(FETCH_FAILED);
                return PollStep::Stop;
            }
        };

        let status = document.status.clone();
        self.status = Some(status.clone());

        if status.carries_document() {
            self.document = Some(document);
        }

        match status {
            AnalysisStatus::Completed => {
                self.phase = SessionPhase::Done(Outcome::Completed);
                PollStep::Stop
            }
            AnalysisStatus::Failed => {
                self.fail(ANALYSIS_FAILED);
                PollStep::Stop
            }
            _ => match max_polls {
                Some(max) if self.polls >= max => {
                    self.fail(POLLS_EXHAUSTED);
                    PollStep::Stop
                }
                _ => PollStep::Continue,
            },
        }
    }

    fn fail(&mut self, message: &str) {
        self.phase = SessionPhase::Done(Outcome::Failed);
        self.error = Some(message.to_string());
    }
}

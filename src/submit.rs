//! Submission control: the repository locator input and its trigger.

/// Outcome of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// `start` was invoked with this (trimmed) locator.
    Accepted(String),
    /// Input was empty or whitespace only.
    Empty,
    /// A previous submission is still running.
    Busy,
}

/// Holds the locator being typed and gates submissions.
///
/// The owner sets `busy` while an analysis runs, so one control can never
/// start two concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionControl {
    locator: String,
    busy: bool,
}

impl SubmissionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locator(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            busy: false,
        }
    }

    pub fn set_locator(&mut self, locator: impl Into<String>) {
        self.locator = locator.into();
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Invoke `start` once with the trimmed locator, unless the input is
    /// blank or the control is busy.
    pub fn trigger<F: FnOnce(&str)>(&self, start: F) -> Submission {
        if self.busy {
            return Submission::Busy;
        }
        let locator = self.locator.trim();
        if locator.is_empty() {
            return Submission::Empty;
        }
        start(locator);
        Submission::Accepted(locator.to_string())
    }
}

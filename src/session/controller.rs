//! Drives one analysis session: create, poll until terminal, publish snapshots.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::state::{PollStep, SessionPhase, SessionSnapshot};
use crate::client::AnalysisBackend;
use crate::errors::BackendError;

/// Poll cadence, limit and per-request deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` polls until the backend reports a terminal status.
    pub max_polls: Option<u32>,
    /// How long a single create or fetch may take before it counts as failed.
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_polls: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Run a backend call under `after`, mapping expiry to [`BackendError::TimedOut`].
async fn with_deadline<T>(
    operation: &'static str,
    after: Duration,
    call: impl Future<Output = Result<T, BackendError>>,
) -> Result<T, BackendError> {
    tokio::time::timeout(after, call)
        .await
        .unwrap_or(Err(BackendError::TimedOut { operation, after }))
}

/// Owns the lifecycle of one analysis at a time.
///
/// State lives in a `watch` channel; renderers hold receivers from
/// [`Self::subscribe`]. At most one poll task exists per controller: starting
/// a new analysis or calling [`Self::reset`] aborts the previous one, and a
/// stale task can no longer write because its generation is out of date.
pub struct SessionController {
    backend: Arc<dyn AnalysisBackend>,
    settings: PollSettings,
    tx: watch::Sender<SessionSnapshot>,
    poller: Option<JoinHandle<()>>,
    generation: u64,
}

impl SessionController {
    pub fn new(backend: Arc<dyn AnalysisBackend>, settings: PollSettings) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            backend,
            settings,
            tx,
            poller: None,
            generation: 0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.tx.borrow().phase.is_busy()
    }

    /// Whether a poll task is still scheduled.
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start analysing `locator`, replacing whatever session was running.
    ///
    /// Returns once the creation request has resolved; polling continues in
    /// the background. Failures end up on the snapshot, not as an `Err`.
    pub async fn start_analysis(&mut self, locator: &str) {
        self.stop_polling();
        self.generation += 1;
        let generation = self.generation;
        self.tx.send_modify(|s| s.begin(generation, locator));
        info!(generation, locator, "starting analysis");

        let created = with_deadline(
            "create_analysis",
            self.settings.request_timeout,
            self.backend.create_analysis(locator),
        )
        .await;
        match created {
            Ok(session_id) => {
                info!(generation, %session_id, "analysis created, polling");
                self.tx.send_modify(|s| s.started(session_id.clone()));
                self.poller = Some(tokio::spawn(poll_loop(
                    Arc::clone(&self.backend),
                    self.tx.clone(),
                    generation,
                    session_id,
                    self.settings,
                )));
            }
            Err(e) => {
                warn!(generation, error = %e, "failed to start analysis");
                self.tx.send_modify(|s| s.start_failed());
            }
        }
    }

    /// Drop the current session and go back to `Idle`.
    pub fn reset(&mut self) {
        self.stop_polling();
        self.generation += 1;
        let generation = self.generation;
        self.tx.send_modify(|s| s.reset(generation));
    }

    /// Wait until the session reaches `Done`, returning the terminal snapshot.
    ///
    /// Resolves immediately when idle, since nothing would ever finish.
    pub async fn wait_until_done(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();
        let result = rx
            .wait_for(|s| s.phase.is_done() || s.phase == SessionPhase::Idle)
            .await
            .map(|s| s.clone());
        // The sender lives in `self`, so the channel cannot close while we wait.
        result.unwrap_or_else(|_| self.snapshot())
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "stopping previous poll loop");
            }
            handle.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

async fn poll_loop(
    backend: Arc<dyn AnalysisBackend>,
    tx: watch::Sender<SessionSnapshot>,
    generation: u64,
    session_id: String,
    settings: PollSettings,
) {
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first fetch waits one interval.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let result = with_deadline(
            "fetch_results",
            settings.request_timeout,
            backend.fetch_results(&session_id),
        )
        .await;
        match &result {
            Ok(doc) => debug!(generation, %session_id, status = %doc.status, "poll"),
            Err(e) => warn!(generation, %session_id, error = %e, "poll failed"),
        }
        if let Ok(doc) = &result {
            if let Some(detail) = doc.error.as_deref() {
                warn!(generation, %session_id, detail, "backend reported an error");
            }
        }

        let mut step = PollStep::Stop;
        let current = tx.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            step = s.apply_poll(result, settings.max_polls);
            true
        });

        if !current {
            debug!(generation, "poll loop superseded");
            break;
        }
        if step == PollStep::Stop {
            info!(generation, %session_id, "polling finished");
            break;
        }
    }
}

use crate::document::Section;
use crate::session::{Outcome, SessionPhase, SessionSnapshot};
use crate::ui::icons::{CHECK, CROSS, HOURGLASS, SPARKLE};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Terminal UI shown while a session is running, rendered via `indicatif`.
///
/// Two bars are stacked vertically:
/// - Session bar: spinner with the repository, phase and poll count
/// - Section bar: which result sections the backend has produced so far
///
/// Each section is announced with its own line the first time it appears, so
/// the scrollback shows the order the backend finished its jobs in.
pub struct SessionUI {
    multi: MultiProgress,
    session_bar: ProgressBar,
    section_bar: ProgressBar,
    verbose: bool,
    announced: Mutex<Vec<Section>>,
}

impl SessionUI {
    /// Create the UI and start the spinner.
    ///
    /// # Arguments
    /// * `locator`: repository being analysed, shown in the session bar
    /// * `verbose`: when `true`, every poll is echoed as a dim line
    pub fn new(locator: &str, verbose: bool) -> Self {
        let multi = MultiProgress::new();

        let spinner_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let session_bar = multi.add(ProgressBar::new_spinner());
        session_bar.set_style(spinner_style);
        session_bar.set_prefix("Analyzing");
        session_bar.set_message(format!(
            "{} {}",
            style(locator).cyan(),
            style("(starting...)").dim()
        ));
        session_bar.enable_steady_tick(Duration::from_millis(100));

        let section_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let section_bar = multi.add(ProgressBar::new(Section::ALL.len() as u64));
        section_bar.set_style(section_style);
        section_bar.set_prefix(" Sections");

        Self {
            multi,
            session_bar,
            section_bar,
            verbose,
            announced: Mutex::new(Vec::new()),
        }
    }

    /// Print a line via `MultiProgress`, falling back to `eprintln!` if the rich UI fails.
    fn print_line(&self, msg: impl AsRef<str>) {
        if self.multi.println(msg.as_ref()).is_err() {
            eprintln!("{}", msg.as_ref());
        }
    }

    /// Reflect a new snapshot in both bars.
    pub fn update(&self, snapshot: &SessionSnapshot) {
        let locator = snapshot.locator.as_deref().unwrap_or_default();
        let phase = match snapshot.phase {
            SessionPhase::Idle => "idle".to_string(),
            SessionPhase::Starting => "starting...".to_string(),
            SessionPhase::Polling => match &snapshot.status {
                Some(status) => format!("{}, poll {}", status, snapshot.polls),
                None => "waiting for first result...".to_string(),
            },
            SessionPhase::Done(Outcome::Completed) => "completed".to_string(),
            SessionPhase::Done(Outcome::Failed) => "failed".to_string(),
        };
        self.session_bar.set_message(format!(
            "{} {}",
            style(locator).cyan(),
            style(format!("({})", phase)).dim()
        ));

        if self.verbose && snapshot.polls > 0 {
            self.print_line(format!(
                "    {} {}",
                style("→").dim(),
                style(format!("poll {}: {}", snapshot.polls, phase)).dim()
            ));
        }

        let Some(doc) = &snapshot.document else {
            return;
        };
        let ready = doc.ready_sections();
        self.section_bar.set_position(ready.len() as u64);
        self.section_bar.set_message(
            ready
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", "),
        );

        let Ok(mut announced) = self.announced.lock() else {
            return;
        };
        for section in ready {
            if !announced.contains(&section) {
                announced.push(section);
                self.print_line(format!("    {}{} ready", CHECK, style(section.label()).green()));
            }
        }
    }

    /// Stop both bars with a success line.
    pub fn finish_completed(&self) {
        self.section_bar.finish();
        self.session_bar.finish_with_message(format!("{}Analysis complete", SPARKLE));
    }

    /// Stop both bars with the session's error message.
    pub fn finish_failed(&self, message: &str) {
        self.section_bar.abandon();
        self.session_bar.abandon_with_message(format!("{}{}", CROSS, style(message).red().bold()));
    }

    /// Clear the UI entirely, for output modes that must stay machine-readable.
    pub fn clear(&self) {
        self.section_bar.finish_and_clear();
        self.session_bar.finish_and_clear();
    }

    pub fn waiting_hint(&self) {
        self.print_line(format!(
            "    {}{}",
            HOURGLASS,
            style("This usually takes about 30-60 seconds.").dim()
        ));
    }
}

pub mod controller;
pub mod state;

pub use controller::{PollSettings, SessionController};
pub use state::{Outcome, PollStep, SessionPhase, SessionSnapshot};

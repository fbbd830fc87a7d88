pub mod icons;
pub mod progress;
pub mod results;

pub use progress::SessionUI;
pub use results::{paint, terminal_width};

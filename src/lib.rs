pub mod client;
pub mod config;
pub mod document;
pub mod errors;
pub mod logging;
pub mod render;
pub mod session;
pub mod submit;
pub mod ui;

//! Typed error hierarchy for the gitsense client.
//!
//! Two enums cover the two places things go wrong:
//! - `BackendError`: talking to the analysis service
//! - `ConfigError`: loading and validating `gitsense.toml`
//!
//! Session failures shown to the user are flat strings on the snapshot, see
//! [`crate::session::SessionSnapshot::error`].

use thiserror::Error;

/// Errors from the analysis backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{operation} got no response within {after:?}")]
    TimedOut {
        operation: &'static str,
        after: std::time::Duration,
    },

    #[error("Cannot build request URL from {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl BackendError {
    /// HTTP status code, when the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ParseFailed {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

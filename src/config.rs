//! Configuration for gitsense.
//!
//! Settings are layered: `gitsense.toml` → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//! poll_interval_ms = 1000
//! # A create or fetch with no answer after this long fails the session
//! request_timeout_ms = 30000
//! # Give up after this many polls (unset = poll until the backend finishes)
//! max_polls = 600
//!
//! [display]
//! default_view = "overview"
//! ```
//!
//! Environment overrides: `GITSENSE_BASE_URL`, `GITSENSE_POLL_INTERVAL_MS`,
//! `GITSENSE_MAX_POLLS`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::DEFAULT_BASE_URL;
use crate::errors::ConfigError;
use crate::render::View;
use crate::session::PollSettings;

pub const CONFIG_FILE_NAME: &str = "gitsense.toml";
pub const ENV_BASE_URL: &str = "GITSENSE_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "GITSENSE_POLL_INTERVAL_MS";
pub const ENV_MAX_POLLS: &str = "GITSENSE_MAX_POLLS";

/// Where the analysis service lives and how often to poll it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polls: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySection {
    /// View shown after an analysis when `--view` is not given.
    #[serde(default = "default_view")]
    pub default_view: String,
}

fn default_view() -> String {
    View::Overview.id().to_string()
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            default_view: default_view(),
        }
    }
}

/// The complete gitsense.toml structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GitsenseToml {
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub display: DisplaySection,
}

impl GitsenseToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, or defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize gitsense.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.backend.base_url = url;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            self.backend.poll_interval_ms = parse_env(ENV_POLL_INTERVAL_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_POLLS) {
            self.backend.max_polls = Some(parse_env(ENV_MAX_POLLS, &raw)?);
        }
        Ok(())
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.backend.poll_interval_ms == 0 {
            warnings.push(
                "backend.poll_interval_ms is 0; polling will hammer the backend".to_string(),
            );
        }
        if self.backend.request_timeout_ms == 0 {
            warnings.push(
                "backend.request_timeout_ms is 0; every request will time out".to_string(),
            );
        }
        let url = self.backend.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "backend.base_url '{}' should start with http:// or https://",
                url
            ));
        }
        if self.backend.max_polls == Some(0) {
            warnings.push("backend.max_polls is 0; every analysis will time out".to_string());
        }
        if self.display.default_view.parse::<View>().is_err() {
            warnings.push(format!(
                "display.default_view '{}' is not a known view; using overview",
                self.display.default_view
            ));
        }

        warnings
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a non-negative integer, got '{}'", raw),
    })
}

/// Default location: `<config dir>/gitsense/gitsense.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gitsense").join(CONFIG_FILE_NAME))
}

/// Effective runtime configuration after all layers are applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub path: Option<PathBuf>,
    pub file_found: bool,
    pub settings: GitsenseToml,
}

impl Config {
    /// Load from `path` (or the default location) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let (settings, file_found) = match &path {
            Some(p) if p.exists() => (GitsenseToml::load(p)?, true),
            _ => (GitsenseToml::default(), false),
        };
        let mut config = Self {
            path,
            file_found,
            settings,
        };
        config.settings.apply_env(lookup)?;
        Ok(config)
    }

    /// Apply CLI flag overrides (the last layer).
    pub fn with_cli_overrides(
        mut self,
        base_url: Option<String>,
        poll_interval_ms: Option<u64>,
    ) -> Self {
        if let Some(url) = base_url {
            self.settings.backend.base_url = url;
        }
        if let Some(ms) = poll_interval_ms {
            self.settings.backend.poll_interval_ms = ms;
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.settings.backend.base_url
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            // tokio's interval panics on a zero period.
            interval: Duration::from_millis(self.settings.backend.poll_interval_ms.max(1)),
            max_polls: self.settings.backend.max_polls,
            request_timeout: Duration::from_millis(self.settings.backend.request_timeout_ms.max(1)),
        }
    }

    pub fn default_view(&self) -> View {
        self.settings.display.default_view.parse().unwrap_or_default()
    }

    pub fn validate(&self) -> Vec<String> {
        self.settings.validate()
    }
}

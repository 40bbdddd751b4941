use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use stackreap_core::{StackStatus, StatusFilter, WaitPolicy};

pub const DEFAULT_PREFIX: &str = "thisguymartin-pit";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/stackreap/stackreap.toml";

/// On-disk settings. Every field is optional in the file; missing ones take the defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: Option<String>,
    pub selection: SelectionConfig,
    pub wait: WaitConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub prefix: String,
    pub status_filter: StatusFilter,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub poll_min_interval_secs: u64,
    pub poll_max_interval_secs: u64,
    pub timeout_secs: u64,
    pub max_poll_retries: u32,
    pub reconcile_timeout_secs: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { prefix: DEFAULT_PREFIX.to_string(), status_filter: StatusFilter::default() }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        let p = WaitPolicy::default();
        Self {
            poll_min_interval_secs: p.poll_min_interval.as_secs(),
            poll_max_interval_secs: p.poll_max_interval.as_secs(),
            timeout_secs: p.overall_timeout.as_secs(),
            max_poll_retries: p.max_poll_retries,
            reconcile_timeout_secs: p.reconcile_timeout.as_secs(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wait.poll_min_interval_secs must be greater than zero")]
    ZeroPollInterval,
    #[error("wait.poll_min_interval_secs ({min}) exceeds wait.poll_max_interval_secs ({max})")]
    InvertedPollBounds { min: u64, max: u64 },
    #[error("wait.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("selection.status_filter is empty")]
    EmptyStatusFilter,
    #[error("selection.status_filter contains unknown status {0}")]
    UnknownStatus(String),
}

/// Values that come from the command line and win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub delete: bool,
}

/// Everything one invocation needs, resolved once and passed to the runner.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub prefix: String,
    /// `None` defers to the ambient AWS configuration.
    pub region: Option<String>,
    pub delete_enabled: bool,
    pub status_filter: StatusFilter,
    pub wait: WaitPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            region: None,
            delete_enabled: false,
            status_filter: StatusFilter::default(),
            wait: WaitPolicy::default(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Like [`Config::load_from`], but a missing file means defaults. Nothing is written back.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).with_context(|| format!("parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.wait;
        if w.poll_min_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if w.poll_min_interval_secs > w.poll_max_interval_secs {
            return Err(ConfigError::InvertedPollBounds { min: w.poll_min_interval_secs, max: w.poll_max_interval_secs });
        }
        if w.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let filter = self.selection.status_filter.statuses();
        if filter.is_empty() {
            return Err(ConfigError::EmptyStatusFilter);
        }
        if let Some(StackStatus::Other(s)) = filter.iter().find(|s| matches!(s, StackStatus::Other(_))) {
            return Err(ConfigError::UnknownStatus(s.clone()));
        }
        Ok(())
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        let w = &self.wait;
        WaitPolicy {
            poll_min_interval: Duration::from_secs(w.poll_min_interval_secs),
            poll_max_interval: Duration::from_secs(w.poll_max_interval_secs),
            overall_timeout: Duration::from_secs(w.timeout_secs),
            max_poll_retries: w.max_poll_retries,
            reconcile_timeout: Duration::from_secs(w.reconcile_timeout_secs),
        }
    }

    /// Applies command-line overrides and validates the result.
    pub fn resolve(self, overrides: Overrides) -> Result<RunConfig, ConfigError> {
        self.validate()?;
        let wait = self.wait_policy();
        // An empty --region means "use the ambient configuration".
        let region = overrides.region.or(self.region).filter(|r| !r.trim().is_empty());
        Ok(RunConfig {
            prefix: overrides.prefix.unwrap_or(self.selection.prefix),
            region,
            delete_enabled: overrides.delete,
            status_filter: self.selection.status_filter,
            wait,
        })
    }
}

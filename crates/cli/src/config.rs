// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration management.
//!
//! Configuration is stored in `<state-dir>/config.toml`. Every field has a
//! default, so a missing or partial file is valid:
//! - `profile`: named timeout profile (`strict` = 2s, `relaxed` = 5s)
//! - `timeout_ms`: explicit per-attempt timeout, overrides the profile
//! - `max_retries`, `retry_delay_ms`: retry budget
//! - `queue_key`, `store`: where the queue lives
//! - `replay_policy`, `reconnect_delay_ms`: replay behavior
//! - `[probe]`: connectivity probe used by `outbox watch`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{
    ReplayPolicy, RetryPolicy, SyncConfig, DEFAULT_MAX_RETRIES, DEFAULT_QUEUE_KEY,
    DEFAULT_RECONNECT_DELAY, DEFAULT_TIMEOUT,
};

const CONFIG_FILE_NAME: &str = "config.toml";
const SQLITE_FILE_NAME: &str = "queue.db";

/// Named per-attempt timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// 2 second timeout.
    #[default]
    Strict,
    /// 5 second timeout, for slow links.
    Relaxed,
}

impl Profile {
    pub fn timeout(self) -> Duration {
        match self {
            Profile::Strict => DEFAULT_TIMEOUT,
            Profile::Relaxed => Duration::from_millis(5000),
        }
    }
}

/// Queue storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// One `<queue_key>.jsonl` file per queue.
    #[default]
    Jsonl,
    /// A single `queue.db` SQLite database.
    Sqlite,
}

/// Connectivity probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` to connect to.
    pub addr: String,
    #[serde(default = "default_probe_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_interval_ms() -> u64 {
    5000
}

fn default_probe_timeout_ms() -> u64 {
    1000
}

impl ProbeConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        ProbeConfig {
            addr: addr.into(),
            interval_ms: default_probe_interval_ms(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Configuration stored in `<state-dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub queue_key: String,
    pub store: StoreKind,
    pub replay_policy: ReplayPolicy,
    pub reconnect_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            profile: Profile::default(),
            timeout_ms: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: 0,
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
            store: StoreKind::default(),
            replay_policy: ReplayPolicy::default(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY.as_millis() as u64,
            probe: None,
        }
    }
}

impl Config {
    /// Loads configuration from the given state directory.
    ///
    /// A missing file yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::create_dir_all(state_dir)?;
        fs::write(state_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_ms == Some(0) {
            return Err(Error::Config("timeout_ms must be greater than 0".to_string()));
        }
        if self.queue_key.trim().is_empty() {
            return Err(Error::Config("queue_key cannot be empty".to_string()));
        }
        if let Some(probe) = &self.probe {
            if probe.addr.trim().is_empty() {
                return Err(Error::Config("probe.addr cannot be empty".to_string()));
            }
            if probe.interval_ms == 0 {
                return Err(Error::Config(
                    "probe.interval_ms must be greater than 0".to_string(),
                ));
            }
            if probe.timeout_ms == 0 {
                return Err(Error::Config(
                    "probe.timeout_ms must be greater than 0".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Per-attempt timeout: `timeout_ms` if set, else the profile's.
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.profile.timeout())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: self.timeout(),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            queue_key: self.queue_key.clone(),
            retry: self.retry_policy(),
            replay_policy: self.replay_policy,
        }
    }

    /// Path of the SQLite database when `store = "sqlite"`.
    pub fn sqlite_path(state_dir: &Path) -> PathBuf {
        state_dir.join(SQLITE_FILE_NAME)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

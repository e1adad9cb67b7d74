// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Feed configuration management.
//!
//! Configuration is read from a TOML file and includes:
//! - `url`: the feed endpoint (`ws://` or `wss://`)
//! - `token`: the bearer token handed to the server
//! - reconnect and probe tuning
//!
//! The file is found via `--config`, then `$JOBFEED_CONFIG`, then
//! `<config dir>/jobfeed/config.toml`. Missing files fall back to defaults.
//! `JOBFEED_URL` and `JOBFEED_TOKEN` override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::env::{self, vars};
use crate::error::{Error, Result};
use crate::sync::{
    ClientOptions, DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_PROBE_INTERVAL,
    DEFAULT_RECONNECT_INTERVAL, DEFAULT_URL,
};

const CONFIG_DIR_NAME: &str = "jobfeed";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Feed client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed endpoint (default: `ws://localhost:8000/ws/jobs`).
    #[serde(default = "default_url")]
    pub url: String,
    /// Bearer token. Required before connecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Reconnect after unplanned closes (default: true).
    #[serde(default = "default_auto_reconnect")]
    pub auto_reconnect: bool,
    /// Delay between reconnect attempts in milliseconds (default: 3000).
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Reconnect attempts before giving up (default: 5).
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Liveness probe interval in milliseconds (default: 30000). 0 = disabled.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Max silence after a probe in milliseconds (default: 0). 0 = disabled.
    #[serde(default)]
    pub probe_timeout_ms: u64,
    /// Received messages kept in memory (default: 100).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_auto_reconnect() -> bool {
    true
}

fn default_reconnect_interval_ms() -> u64 {
    DEFAULT_RECONNECT_INTERVAL.as_millis() as u64
}

fn default_max_reconnect_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}

fn default_probe_interval_ms() -> u64 {
    DEFAULT_PROBE_INTERVAL.as_millis() as u64
}

fn default_history_capacity() -> usize {
    jf_core::DEFAULT_HISTORY_CAPACITY
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: default_url(),
            token: None,
            auto_reconnect: default_auto_reconnect(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: 0,
            history_capacity: default_history_capacity(),
        }
    }
}

impl FeedConfig {
    /// Loads configuration from the given file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: FeedConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Finds and loads the configuration, then applies environment overrides.
    ///
    /// An explicit path must exist; the default location may not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit.map(Path::to_path_buf).or_else(env::config_path) {
            Some(path) => FeedConfig::load(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => FeedConfig::load(&path)?,
                _ => FeedConfig::default(),
            },
        };
        config.apply_env(env::lookup);
        Ok(config)
    }

    /// Applies `JOBFEED_URL` and `JOBFEED_TOKEN` through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(vars::JOBFEED_URL) {
            self.url = url;
        }
        if let Some(token) = lookup(vars::JOBFEED_TOKEN) {
            self.token = Some(token);
        }
    }

    /// Checks the settings that can be checked without a job id.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url).map_err(|e| Error::InvalidSetting {
            field: "url",
            reason: format!("'{}': {}", self.url, e),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::InvalidSetting {
                field: "url",
                reason: format!("'{}': must be ws:// or wss://", self.url),
            });
        }
        Ok(())
    }

    /// Client options for the given job.
    pub fn client_options(&self, job_id: &str) -> Result<ClientOptions> {
        self.validate()?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::MissingToken)?;

        let probe_timeout =
            (self.probe_timeout_ms > 0).then(|| Duration::from_millis(self.probe_timeout_ms));
        Ok(ClientOptions {
            job_id: job_id.to_string(),
            token: token.to_string(),
            url: self.url.clone(),
            auto_reconnect: self.auto_reconnect,
            reconnect_interval: Duration::from_millis(self.reconnect_interval_ms),
            max_reconnect_attempts: self.max_reconnect_attempts,
            probe_interval: Duration::from_millis(self.probe_interval_ms),
            probe_timeout,
            history_capacity: self.history_capacity,
        })
    }
}

/// Default config file location, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

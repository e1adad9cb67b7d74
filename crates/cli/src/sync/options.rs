// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Options for a [`FeedClient`](super::FeedClient).

use std::time::Duration;

use jf_core::DEFAULT_HISTORY_CAPACITY;
use url::Url;

use super::state::FeedError;

/// Default feed endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:8000/ws/jobs";

/// Default delay between reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);

/// Default reconnect budget.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default liveness probe cadence.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for a feed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Job to subscribe to. Required.
    pub job_id: String,
    /// Opaque bearer token. Required.
    pub token: String,
    /// Base `ws://` or `wss://` endpoint.
    pub url: String,
    pub auto_reconnect: bool,
    pub reconnect_interval: Duration,
    pub max_reconnect_attempts: u32,
    /// Zero disables probing.
    pub probe_interval: Duration,
    /// Treat the connection as dead when nothing arrives this long after a probe.
    pub probe_timeout: Option<Duration>,
    pub history_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            job_id: String::new(),
            token: String::new(),
            url: DEFAULT_URL.to_string(),
            auto_reconnect: true,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            probe_interval: DEFAULT_PROBE_INTERVAL,
            probe_timeout: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ClientOptions {
    pub fn new(job_id: impl Into<String>, token: impl Into<String>) -> Self {
        ClientOptions {
            job_id: job_id.into(),
            token: token.into(),
            ..ClientOptions::default()
        }
    }

    /// Checks the required fields. No socket is opened when this fails.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.job_id.trim().is_empty() {
            return Err(FeedError::MissingJobId);
        }
        if self.token.trim().is_empty() {
            return Err(FeedError::MissingToken);
        }
        parse_base(&self.url).map(|_| ())
    }

    /// Full socket URL with the subscription parameters appended.
    pub fn socket_url(&self, connection_id: &str) -> Result<String, FeedError> {
        self.validate()?;
        let mut url = parse_base(&self.url)?;
        url.query_pairs_mut()
            .append_pair("job_id", &self.job_id)
            .append_pair("token", &self.token)
            .append_pair("connection_id", connection_id);
        Ok(url.into())
    }
}

fn parse_base(raw: &str) -> Result<Url, FeedError> {
    let url = Url::parse(raw).map_err(|e| FeedError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(FeedError::InvalidUrl(format!(
            "{}: unsupported scheme '{}', expected ws or wss",
            raw, other
        ))),
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire envelope for the job-progress feed.
//!
//! Every frame on the socket is a JSON object:
//!
//! ```json
//! {"type": "job.progress", "ts": "2026-01-01T00:00:00Z", "correlation_id": "c-1", "data": {}}
//! ```
//!
//! - `type` selects the consumer callback (see [`EventKind`])
//! - `ts` is an RFC 3339 string or a unix timestamp (seconds or milliseconds)
//! - `correlation_id` and `data` are optional

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Type tag of the liveness probe sent by the client.
pub const PROBE_TYPE: &str = "ping";

/// A single message on the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    /// Event type tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// When the server produced the event.
    ///
    /// Defaults to the local decode time when the server omits it or sends a
    /// value that cannot be read.
    #[serde(rename = "ts", default = "decoded_at", deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,

    /// Server correlation id, empty when absent.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub correlation_id: String,

    /// Event payload.
    #[serde(rename = "data", default)]
    pub payload: Value,
}

/// Recognized event types.
///
/// Each recognized type maps to at most one consumer callback. Any other
/// `type` is accepted and dropped by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Aggregate job counters snapshot.
    JobProgress,
    /// Single job state transition.
    JobStateChanged,
    VideoCreated,
    VideoUpdated,
    VideoCompleted,
    VideoFailed,
    JobCompleted,
    JobFailed,
    JobCanceled,
    /// Response to a liveness probe.
    Pong,
}

impl EventKind {
    /// Every recognized kind, in wire-documentation order.
    pub const ALL: [EventKind; 10] = [
        EventKind::JobProgress,
        EventKind::JobStateChanged,
        EventKind::VideoCreated,
        EventKind::VideoUpdated,
        EventKind::VideoCompleted,
        EventKind::VideoFailed,
        EventKind::JobCompleted,
        EventKind::JobFailed,
        EventKind::JobCanceled,
        EventKind::Pong,
    ];

    /// The wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::JobProgress => "job.progress",
            EventKind::JobStateChanged => "job.state_changed",
            EventKind::VideoCreated => "video.created",
            EventKind::VideoUpdated => "video.updated",
            EventKind::VideoCompleted => "video.completed",
            EventKind::VideoFailed => "video.failed",
            EventKind::JobCompleted => "job.completed",
            EventKind::JobFailed => "job.failed",
            EventKind::JobCanceled => "job.canceled",
            EventKind::Pong => "pong",
        }
    }

    /// Parses a wire tag. Returns `None` for unrecognized tags.
    pub fn parse(tag: &str) -> Option<Self> {
        EventKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// True for the three job-ending events.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EventKind::JobCompleted | EventKind::JobFailed | EventKind::JobCanceled
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Envelope {
    /// Creates an envelope stamped with the current time.
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Envelope {
            kind: kind.into(),
            timestamp: Utc::now(),
            correlation_id: String::new(),
            payload,
        }
    }

    /// Creates a liveness probe.
    pub fn probe(correlation_id: impl Into<String>) -> Self {
        Envelope {
            kind: PROBE_TYPE.to_string(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.into(),
            payload: Value::Null,
        }
    }

    /// Sets the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// The recognized kind of this envelope, if any.
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::parse(&self.kind)
    }

    /// Serializes the envelope to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an envelope from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

fn decoded_at() -> DateTime<Utc> {
    Utc::now()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Integers at or above this magnitude are milliseconds, below are seconds.
    const MILLIS_THRESHOLD: u64 = 100_000_000_000;

    /// Naive layouts the feed has been seen to emit, read as UTC.
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Integer(i64),
        Float(f64),
        Text(String),
        Other(Value),
    }

    /// Never fails: `ts` is informational, so an unreadable value falls back
    /// to the decode time instead of rejecting the envelope.
    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Wire::deserialize(deserializer)? {
            Wire::Integer(n) => from_integer(n),
            Wire::Float(secs) => from_float(secs),
            Wire::Text(text) => parse_text(&text),
            Wire::Other(value) => Err(format!("unsupported timestamp: {}", value)),
        };
        Ok(parsed.unwrap_or_else(|reason| {
            tracing::debug!(%reason, "using decode time for message timestamp");
            Utc::now()
        }))
    }

    fn from_integer(n: i64) -> Result<DateTime<Utc>, String> {
        let ts = if n.unsigned_abs() >= MILLIS_THRESHOLD {
            Utc.timestamp_millis_opt(n)
        } else {
            Utc.timestamp_opt(n, 0)
        };
        ts.single()
            .ok_or_else(|| format!("timestamp out of range: {}", n))
    }

    fn from_float(secs: f64) -> Result<DateTime<Utc>, String> {
        let millis = (secs * 1000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return Err(format!("timestamp out of range: {}", secs));
        }
        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .ok_or_else(|| format!("timestamp out of range: {}", secs))
    }

    fn parse_text(text: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Ok(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(|naive| naive.and_utc())
            .ok_or_else(|| format!("invalid timestamp '{}'", text))
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;

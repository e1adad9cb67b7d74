// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Payload models carried in envelope `data`.
//!
//! All models are lenient: counters default to zero and optional fields to
//! `None`, so a partial server snapshot still decodes. Unknown state strings
//! decode to an `Unknown` variant instead of failing the whole event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Aggregate progress snapshot for a bulk job.
///
/// The server is the source of truth: the client never corrects counters,
/// even when they do not add up to `items_total`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub items_total: u64,
    pub items_completed: u64,
    pub items_failed: u64,
    pub items_skipped: u64,
    #[serde(alias = "items_cancelled")]
    pub items_canceled: u64,
    pub items_pending: u64,
    /// Seconds between job creation and first item starting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_start_seconds: Option<f64>,
    /// Seconds spent processing so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_seconds_per_item: Option<f64>,
    /// Estimated seconds until completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_seconds: Option<f64>,
    /// True while the backend is throttling this job.
    pub rate_limited: bool,
}

impl JobProgress {
    /// Items that reached a final state (completed, failed, skipped or canceled).
    pub fn items_finished(&self) -> u64 {
        self.items_completed
            .saturating_add(self.items_failed)
            .saturating_add(self.items_skipped)
            .saturating_add(self.items_canceled)
    }

    /// Percentage of finished items, in `0.0..=100.0`.
    pub fn percent_complete(&self) -> f64 {
        if self.items_total == 0 {
            return 0.0;
        }
        let pct = self.items_finished() as f64 * 100.0 / self.items_total as f64;
        pct.min(100.0)
    }

    /// Whether the per-state counters add up to the total.
    pub fn is_balanced(&self) -> bool {
        self.items_finished().saturating_add(self.items_pending) == self.items_total
    }
}

/// Lifecycle of a bulk job.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Pending,
    Scheduled,
    #[serde(alias = "processing", alias = "in_progress")]
    Running,
    Paused,
    Completed,
    Failed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Returns true if the job will not change state again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Scheduled => "scheduled",
            JobState::Running => "running",
            JobState::Paused => "paused",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Canceled => "canceled",
            JobState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single video item within a job.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    #[default]
    Pending,
    Queued,
    #[serde(alias = "running", alias = "in_progress")]
    Processing,
    Completed,
    Failed,
    Skipped,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

impl VideoState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            VideoState::Completed | VideoState::Failed | VideoState::Skipped | VideoState::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoState::Pending => "pending",
            VideoState::Queued => "queued",
            VideoState::Processing => "processing",
            VideoState::Completed => "completed",
            VideoState::Failed => "failed",
            VideoState::Skipped => "skipped",
            VideoState::Canceled => "canceled",
            VideoState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VideoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one item. Keyed by `id`; later updates replace earlier ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoProgress {
    pub id: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default, alias = "status")]
    pub state: VideoState,
    /// Completion in percent.
    #[serde(default, alias = "progress")]
    pub progress_percent: f64,
    /// Source row in the job's input sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Output artifacts, opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single job state change notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobStateTransition {
    #[serde(alias = "old_state", alias = "previous_state")]
    pub prior_state: JobState,
    pub new_state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload of the job-ending events (`job.completed`, `job.failed`, `job.canceled`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Final counters, when the server includes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
    /// Any other fields the server attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::FeedError;

/// All possible errors that can occur in the jobfeed CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no token configured\n  hint: pass --token, set JOBFEED_TOKEN, or add `token` to the config file")]
    MissingToken,

    #[error("invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("job {job_id} ended: {state}")]
    JobEnded { job_id: String, state: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for jobfeed operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

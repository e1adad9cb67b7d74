// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const JOBFEED_CONFIG: &str = "JOBFEED_CONFIG";
    pub const JOBFEED_URL: &str = "JOBFEED_URL";
    pub const JOBFEED_TOKEN: &str = "JOBFEED_TOKEN";
    pub const JOBFEED_LOG: &str = "JOBFEED_LOG";
    pub const NO_COLOR: &str = "NO_COLOR";
    pub const COLOR: &str = "COLOR";
}

/// Reads a variable, treating empty values as unset.
pub fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Returns the value of `JOBFEED_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    lookup(vars::JOBFEED_CONFIG).map(PathBuf::from)
}

/// Returns the value of `JOBFEED_LOG` if set.
pub fn log_filter() -> Option<String> {
    lookup(vars::JOBFEED_LOG)
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod url;
pub mod watch;

use crate::cli::FeedArgs;
use crate::config::FeedConfig;
use crate::error::Result;

/// Loads the configuration and applies command-line overrides on top.
///
/// Precedence: flags, then environment, then the config file, then defaults.
pub(crate) fn resolve_config(feed: &FeedArgs) -> Result<FeedConfig> {
    let mut config = FeedConfig::discover(feed.config.as_deref())?;
    if let Some(ref url) = feed.url {
        config.url = url.clone();
    }
    if let Some(ref token) = feed.token {
        config.token = Some(token.clone());
    }
    Ok(config)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

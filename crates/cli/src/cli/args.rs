// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! Used with `#[command(flatten)]` by every command that resolves a feed
//! endpoint.

use std::path::PathBuf;

use clap::Args;

/// Endpoint and credential arguments.
#[derive(Args, Clone, Debug, Default)]
pub struct FeedArgs {
    /// Bearer token (overrides JOBFEED_TOKEN and the config file)
    #[arg(long, value_parser = super::non_empty_string)]
    pub token: Option<String>,

    /// Feed endpoint, ws:// or wss:// (overrides JOBFEED_URL and the config file)
    #[arg(long, value_parser = super::non_empty_string)]
    pub url: Option<String>,

    /// Config file (default: $JOBFEED_CONFIG or <config dir>/jobfeed/config.toml)
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,
}

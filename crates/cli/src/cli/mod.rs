// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::FeedArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "jobfeed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Follow the live progress feed of a bulk video job")]
#[command(
    long_about = "Follow the live progress feed of a bulk video job.\n\n\
    Connects to the job feed over a WebSocket, prints every progress event, \
    and reconnects on its own when the connection drops."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stream a job's events until the job ends
    #[command(after_help = "\
Examples:
  jobfeed watch job-42 --token abc         Follow job-42 on the default endpoint
  jobfeed watch job-42 -o json             Print one JSON object per event
  jobfeed watch job-42 --no-reconnect      Exit on the first dropped connection")]
    Watch {
        /// Job to follow
        #[arg(value_parser = non_empty_string)]
        job_id: String,

        #[command(flatten)]
        feed: FeedArgs,

        /// Do not reconnect after the connection drops
        #[arg(long)]
        no_reconnect: bool,

        /// Delay between reconnect attempts in milliseconds
        #[arg(long, value_name = "ms")]
        reconnect_interval_ms: Option<u64>,

        /// Reconnect attempts before giving up
        #[arg(long, value_name = "n")]
        max_reconnect_attempts: Option<u32>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Log connection activity to stderr
        #[arg(long, short)]
        verbose: bool,
    },

    /// Print the socket URL a watch would connect to
    Url {
        /// Job to follow
        #[arg(value_parser = non_empty_string)]
        job_id: String,

        #[command(flatten)]
        feed: FeedArgs,

        /// Print the token instead of redacting it
        #[arg(long)]
        show_token: bool,
    },
}

impl Command {
    /// True when the command asked for debug logging.
    pub fn verbose(&self) -> bool {
        matches!(self, Command::Watch { verbose: true, .. })
    }
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;

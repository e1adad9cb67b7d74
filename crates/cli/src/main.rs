// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use jobfeed::{env, Cli};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays clean for event output.
fn setup_logging(verbose: bool) {
    let filter = match env::log_filter() {
        Some(filter) => EnvFilter::new(filter),
        None if verbose => EnvFilter::new("jobfeed=debug,jf_core=debug"),
        None => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.command.verbose());
    if let Err(e) = jobfeed::run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

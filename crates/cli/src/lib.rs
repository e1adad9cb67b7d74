// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! jobfeed - live progress feed client for bulk video jobs.
//!
//! This crate provides the WebSocket client behind the `jobfeed` CLI. It
//! keeps one job's feed connected, reconnects after drops, probes liveness,
//! and dispatches typed events to consumer callbacks.
//!
//! # Main Components
//!
//! - [`sync::FeedClient`] - Connection manager for one job's feed
//! - [`sync::Handlers`] - Typed per-event callbacks
//! - [`config::FeedConfig`] - TOML configuration with environment overrides
//! - [`Error`] - Error types for CLI operations
//!
//! ```rust,ignore
//! use jobfeed::sync::{ClientOptions, FeedClient, Handlers};
//!
//! let handlers = Handlers::new().on_progress(|p| println!("{}/{}", p.items_completed, p.items_total));
//! let client = FeedClient::new(ClientOptions::new("job-42", token), handlers);
//! client.connect().await;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod env;

pub mod config;
pub mod error;
pub mod id;
pub mod sync;

pub use cli::{Cli, Command, FeedArgs, OutputFormat};
pub use config::FeedConfig;
pub use error::{Error, Result};

/// Execute a CLI command.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Watch {
            job_id,
            feed,
            no_reconnect,
            reconnect_interval_ms,
            max_reconnect_attempts,
            output,
            verbose: _,
        } => {
            commands::watch::run(
                job_id,
                feed,
                no_reconnect,
                reconnect_interval_ms,
                max_reconnect_attempts,
                output,
            )
            .await
        }
        Command::Url {
            job_id,
            feed,
            show_token,
        } => commands::url::run(&job_id, &feed, show_token),
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! jf-core: Shared data model for the jobfeed progress client
//!
//! This crate provides the wire envelope, the typed job/video payloads, the
//! typed event view used for dispatch, and the bounded message history used
//! by the `jobfeed` client and CLI.

pub mod envelope;
pub mod error;
pub mod event;
pub mod history;
pub mod progress;
pub mod tracker;

pub use envelope::{Envelope, EventKind, PROBE_TYPE};
pub use error::{Error, Result};
pub use event::FeedEvent;
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use progress::{
    JobOutcome, JobProgress, JobState, JobStateTransition, VideoProgress, VideoState,
};
pub use tracker::JobTracker;

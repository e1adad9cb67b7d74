// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch of decoded envelopes to consumer callbacks.
//!
//! Each recognized event type maps to exactly one callback slot:
//!
//! | type | slot |
//! |------|------|
//! | `job.progress` | [`on_progress`](Handlers::on_progress) |
//! | `job.state_changed` | [`on_state_change`](Handlers::on_state_change) |
//! | `video.created` | [`on_video_created`](Handlers::on_video_created), else [`on_video_update`](Handlers::on_video_update) |
//! | `video.updated` | [`on_video_update`](Handlers::on_video_update) |
//! | `video.completed` | [`on_video_completed`](Handlers::on_video_completed) |
//! | `video.failed` | [`on_video_failed`](Handlers::on_video_failed) |
//! | `job.completed` | [`on_job_completed`](Handlers::on_job_completed) |
//! | `job.failed` | [`on_job_failed`](Handlers::on_job_failed) |
//! | `job.canceled` | [`on_job_canceled`](Handlers::on_job_canceled) |
//!
//! `pong` has no slot. Every routed envelope lands in the history buffer,
//! whether or not a callback ran.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jf_core::{
    Envelope, EventKind, FeedEvent, HistoryBuffer, JobOutcome, JobProgress, JobStateTransition,
    VideoProgress,
};

use super::state::FeedError;

/// A consumer callback.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Consumer callbacks. All optional.
///
/// Callbacks run on the connection task, in arrival order. A slow callback
/// delays every later frame; a panicking one takes the task down.
#[derive(Clone, Default)]
pub struct Handlers {
    on_progress: Option<Callback<JobProgress>>,
    on_state_change: Option<Callback<JobStateTransition>>,
    on_video_created: Option<Callback<VideoProgress>>,
    on_video_update: Option<Callback<VideoProgress>>,
    on_video_completed: Option<Callback<VideoProgress>>,
    on_video_failed: Option<Callback<VideoProgress>>,
    on_job_completed: Option<Callback<JobOutcome>>,
    on_job_failed: Option<Callback<JobOutcome>>,
    on_job_canceled: Option<Callback<JobOutcome>>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("on_progress", &self.on_progress.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .field("on_video_created", &self.on_video_created.is_some())
            .field("on_video_update", &self.on_video_update.is_some())
            .field("on_video_completed", &self.on_video_completed.is_some())
            .field("on_video_failed", &self.on_video_failed.is_some())
            .field("on_job_completed", &self.on_job_completed.is_some())
            .field("on_job_failed", &self.on_job_failed.is_some())
            .field("on_job_canceled", &self.on_job_canceled.is_some())
            .finish()
    }
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate counters snapshot.
    pub fn on_progress(mut self, f: impl Fn(&JobProgress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }

    pub fn on_state_change(
        mut self,
        f: impl Fn(&JobStateTransition) + Send + Sync + 'static,
    ) -> Self {
        self.on_state_change = Some(Arc::new(f));
        self
    }

    /// Receives `video.created` only. Without it, creations go to
    /// [`on_video_update`](Self::on_video_update).
    pub fn on_video_created(
        mut self,
        f: impl Fn(&VideoProgress) + Send + Sync + 'static,
    ) -> Self {
        self.on_video_created = Some(Arc::new(f));
        self
    }

    /// Receives `video.updated`, and `video.created` when no
    /// [`on_video_created`](Self::on_video_created) slot is set.
    pub fn on_video_update(mut self, f: impl Fn(&VideoProgress) + Send + Sync + 'static) -> Self {
        self.on_video_update = Some(Arc::new(f));
        self
    }

    pub fn on_video_completed(
        mut self,
        f: impl Fn(&VideoProgress) + Send + Sync + 'static,
    ) -> Self {
        self.on_video_completed = Some(Arc::new(f));
        self
    }

    pub fn on_video_failed(mut self, f: impl Fn(&VideoProgress) + Send + Sync + 'static) -> Self {
        self.on_video_failed = Some(Arc::new(f));
        self
    }

    pub fn on_job_completed(mut self, f: impl Fn(&JobOutcome) + Send + Sync + 'static) -> Self {
        self.on_job_completed = Some(Arc::new(f));
        self
    }

    pub fn on_job_failed(mut self, f: impl Fn(&JobOutcome) + Send + Sync + 'static) -> Self {
        self.on_job_failed = Some(Arc::new(f));
        self
    }

    pub fn on_job_canceled(mut self, f: impl Fn(&JobOutcome) + Send + Sync + 'static) -> Self {
        self.on_job_canceled = Some(Arc::new(f));
        self
    }

    /// Invokes the slot for `event`. Returns false when the slot is empty.
    fn dispatch(&self, event: &FeedEvent) -> bool {
        fn call<T>(slot: &Option<Callback<T>>, value: &T) -> bool {
            match slot {
                Some(f) => {
                    f(value);
                    true
                }
                None => false,
            }
        }

        match event {
            FeedEvent::Progress(p) => call(&self.on_progress, p),
            FeedEvent::StateChanged(t) => call(&self.on_state_change, t),
            FeedEvent::VideoCreated(v) => match self.on_video_created {
                Some(_) => call(&self.on_video_created, v),
                None => call(&self.on_video_update, v),
            },
            FeedEvent::VideoUpdated(v) => call(&self.on_video_update, v),
            FeedEvent::VideoCompleted(v) => call(&self.on_video_completed, v),
            FeedEvent::VideoFailed(v) => call(&self.on_video_failed, v),
            FeedEvent::JobCompleted(o) => call(&self.on_job_completed, o),
            FeedEvent::JobFailed(o) => call(&self.on_job_failed, o),
            FeedEvent::JobCanceled(o) => call(&self.on_job_canceled, o),
            FeedEvent::Pong => false,
        }
    }
}

/// History buffer shared between the connection task and the client handle.
#[derive(Debug, Clone)]
pub struct SharedHistory(Arc<Mutex<HistoryBuffer>>);

impl SharedHistory {
    pub fn new(capacity: usize) -> Self {
        SharedHistory(Arc::new(Mutex::new(HistoryBuffer::new(capacity))))
    }

    /// Poisoning is ignored; a panicking callback leaves the buffer intact.
    fn lock(&self) -> MutexGuard<'_, HistoryBuffer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, envelope: Envelope) {
        self.lock().push(envelope);
    }

    pub fn snapshot(&self) -> Vec<Envelope> {
        self.lock().snapshot()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// What the router did with an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A callback ran.
    Dispatched(EventKind),
    /// Recognized, but no callback is registered.
    Unhandled(EventKind),
    /// Probe response.
    Pong,
    /// Unknown `type`; dropped.
    Unrecognized(String),
    /// Recognized type whose payload did not match its model.
    Rejected(FeedError),
}

/// Routes envelopes to [`Handlers`] and records them in history.
#[derive(Debug)]
pub struct MessageRouter {
    handlers: Handlers,
    history: SharedHistory,
}

impl MessageRouter {
    pub fn new(handlers: Handlers, history: SharedHistory) -> Self {
        MessageRouter { handlers, history }
    }

    pub fn route(&self, envelope: &Envelope) -> RouteOutcome {
        self.history.push(envelope.clone());

        match FeedEvent::from_envelope(envelope) {
            Ok(Some(FeedEvent::Pong)) => {
                tracing::trace!(correlation_id = %envelope.correlation_id, "pong");
                RouteOutcome::Pong
            }
            Ok(Some(event)) => {
                let kind = event.kind();
                if self.handlers.dispatch(&event) {
                    RouteOutcome::Dispatched(kind)
                } else {
                    RouteOutcome::Unhandled(kind)
                }
            }
            Ok(None) => {
                tracing::debug!(kind = %envelope.kind, "ignoring unrecognized message type");
                RouteOutcome::Unrecognized(envelope.kind.clone())
            }
            Err(e) => {
                tracing::warn!(kind = %envelope.kind, error = %e, "rejected message payload");
                RouteOutcome::Rejected(FeedError::Decode(e.to_string()))
            }
        }
    }
}

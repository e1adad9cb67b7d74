// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed view of recognized envelopes.
//!
//! The router decodes an [`Envelope`] into a [`FeedEvent`] once, then
//! dispatches on the variant. Unrecognized types never reach this enum.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::envelope::{Envelope, EventKind};
use crate::error::{Error, Result};
use crate::progress::{JobOutcome, JobProgress, JobStateTransition, VideoProgress};

/// A decoded feed event.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Progress(JobProgress),
    StateChanged(JobStateTransition),
    VideoCreated(VideoProgress),
    VideoUpdated(VideoProgress),
    VideoCompleted(VideoProgress),
    VideoFailed(VideoProgress),
    JobCompleted(JobOutcome),
    JobFailed(JobOutcome),
    JobCanceled(JobOutcome),
    Pong,
}

impl FeedEvent {
    /// Decodes the envelope payload according to its type.
    ///
    /// Returns `Ok(None)` when the type is not recognized.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<FeedEvent>> {
        match envelope.event_kind() {
            Some(kind) => FeedEvent::decode(kind, &envelope.payload).map(Some),
            None => Ok(None),
        }
    }

    /// Decodes a payload for a known kind.
    ///
    /// A `null` payload is treated as an empty object, so kinds whose model
    /// is all-optional still decode.
    pub fn decode(kind: EventKind, payload: &Value) -> Result<FeedEvent> {
        let event = match kind {
            EventKind::JobProgress => FeedEvent::Progress(model(kind, payload)?),
            EventKind::JobStateChanged => FeedEvent::StateChanged(model(kind, payload)?),
            EventKind::VideoCreated => FeedEvent::VideoCreated(model(kind, payload)?),
            EventKind::VideoUpdated => FeedEvent::VideoUpdated(model(kind, payload)?),
            EventKind::VideoCompleted => FeedEvent::VideoCompleted(model(kind, payload)?),
            EventKind::VideoFailed => FeedEvent::VideoFailed(model(kind, payload)?),
            EventKind::JobCompleted => FeedEvent::JobCompleted(model(kind, payload)?),
            EventKind::JobFailed => FeedEvent::JobFailed(model(kind, payload)?),
            EventKind::JobCanceled => FeedEvent::JobCanceled(model(kind, payload)?),
            EventKind::Pong => FeedEvent::Pong,
        };
        Ok(event)
    }

    /// The kind this event was decoded from.
    ///
    /// `VideoCreated` and `VideoUpdated` keep their own kinds even though
    /// consumers receive both through the same callback.
    pub fn kind(&self) -> EventKind {
        match self {
            FeedEvent::Progress(_) => EventKind::JobProgress,
            FeedEvent::StateChanged(_) => EventKind::JobStateChanged,
            FeedEvent::VideoCreated(_) => EventKind::VideoCreated,
            FeedEvent::VideoUpdated(_) => EventKind::VideoUpdated,
            FeedEvent::VideoCompleted(_) => EventKind::VideoCompleted,
            FeedEvent::VideoFailed(_) => EventKind::VideoFailed,
            FeedEvent::JobCompleted(_) => EventKind::JobCompleted,
            FeedEvent::JobFailed(_) => EventKind::JobFailed,
            FeedEvent::JobCanceled(_) => EventKind::JobCanceled,
            FeedEvent::Pong => EventKind::Pong,
        }
    }

    /// The video carried by this event, if any.
    pub fn video(&self) -> Option<&VideoProgress> {
        match self {
            FeedEvent::VideoCreated(v)
            | FeedEvent::VideoUpdated(v)
            | FeedEvent::VideoCompleted(v)
            | FeedEvent::VideoFailed(v) => Some(v),
            _ => None,
        }
    }
}

fn model<T: DeserializeOwned>(kind: EventKind, payload: &Value) -> Result<T> {
    let value = match payload {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|source| Error::Payload { kind, source })
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

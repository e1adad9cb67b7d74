// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use jf_core::{Envelope, FeedEvent};
use serde_json::{json, Value};

use super::client::FeedClient;
use super::options::ClientOptions;
use super::router::Handlers;
use super::state::ConnectionState;
use super::transport_tests::{MockServer, MockTransport};

/// Events seen by the recording handlers, in callback order.
pub type Recorded = Arc<Mutex<Vec<FeedEvent>>>;

/// Handlers that record every callback as the equivalent [`FeedEvent`].
pub fn recording_handlers() -> (Handlers, Recorded) {
    let events: Recorded = Arc::new(Mutex::new(Vec::new()));
    let push = |events: &Recorded| {
        let events = Arc::clone(events);
        move |event: FeedEvent| events.lock().unwrap().push(event)
    };

    let (progress, state, video, video_done, video_failed) = (
        push(&events),
        push(&events),
        push(&events),
        push(&events),
        push(&events),
    );
    let (completed, failed, canceled) = (push(&events), push(&events), push(&events));
    let created = push(&events);

    let handlers = Handlers::new()
        .on_progress(move |p| progress(FeedEvent::Progress(p.clone())))
        .on_state_change(move |t| state(FeedEvent::StateChanged(t.clone())))
        .on_video_created(move |v| created(FeedEvent::VideoCreated(v.clone())))
        .on_video_update(move |v| video(FeedEvent::VideoUpdated(v.clone())))
        .on_video_completed(move |v| video_done(FeedEvent::VideoCompleted(v.clone())))
        .on_video_failed(move |v| video_failed(FeedEvent::VideoFailed(v.clone())))
        .on_job_completed(move |o| completed(FeedEvent::JobCompleted(o.clone())))
        .on_job_failed(move |o| failed(FeedEvent::JobFailed(o.clone())))
        .on_job_canceled(move |o| canceled(FeedEvent::JobCanceled(o.clone())));
    (handlers, events)
}

/// Options for a job with probing at the default cadence.
pub fn test_options() -> ClientOptions {
    ClientOptions::new("job-1", "secret")
}

/// A client over a mock transport, with recording handlers.
pub fn mock_client(options: ClientOptions) -> (FeedClient, MockServer, Recorded) {
    let (transport, server) = MockTransport::new();
    let (handlers, recorded) = recording_handlers();
    let client = FeedClient::with_transport(options, handlers, transport);
    (client, server, recorded)
}

/// Envelope with the given type and payload.
pub fn envelope(kind: &str, data: Value) -> Envelope {
    Envelope::new(kind, data)
}

/// A `job.progress` envelope.
pub fn progress_envelope(total: u64, completed: u64) -> Envelope {
    envelope(
        "job.progress",
        json!({"items_total": total, "items_completed": completed, "items_pending": total - completed}),
    )
}

/// Lets the connection task drain its inputs.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Waits until the client state matches `pred` and returns that state.
pub async fn wait_for_state(
    client: &FeedClient,
    pred: impl FnMut(&ConnectionState) -> bool,
) -> ConnectionState {
    let mut rx = client.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(600), rx.wait_for(pred))
        .await
        .expect("timed out waiting for state")
        .expect("connection task stopped");
    (*state).clone()
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use jf_core::{FeedEvent, JobOutcome, JobProgress, JobTracker, VideoProgress};
use serde_json::{json, Value};

use crate::colors::Palette;
use crate::error::Result;

/// Format whole seconds as `1h02m03s`, `2m03s` or `3s`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h{:02}m{:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m{:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Counters line for a progress snapshot.
///
/// ```text
/// 3/10 (30%) failed 1 skipped 0 eta 2m05s
/// ```
pub fn format_progress(progress: &JobProgress) -> String {
    let mut line = format!(
        "{}/{} ({:.0}%)",
        progress.items_finished(),
        progress.items_total,
        progress.percent_complete()
    );
    if progress.items_failed > 0 || progress.items_skipped > 0 {
        line.push_str(&format!(
            " failed {} skipped {}",
            progress.items_failed, progress.items_skipped
        ));
    }
    if progress.items_canceled > 0 {
        line.push_str(&format!(" canceled {}", progress.items_canceled));
    }
    if let Some(eta) = progress.eta_seconds {
        line.push_str(&format!(" eta {}", format_duration(eta)));
    }
    if progress.rate_limited {
        line.push_str(" [rate limited]");
    }
    line
}

fn format_video(video: &VideoProgress, palette: &Palette) -> String {
    let mut line = palette.literal(&video.id);
    if let Some(row) = video.row_index {
        line.push_str(&format!(" row {}", row));
    }
    line.push(' ');
    line.push_str(&palette.video_state(video.state));
    if !video.state.is_terminal() && video.progress_percent > 0.0 {
        line.push_str(&format!(" {:.0}%", video.progress_percent));
    }
    if let Some(ref title) = video.title {
        line.push_str(&format!(" \"{}\"", title));
    }
    if let Some(ref error) = video.error {
        line.push_str(&format!(": {}", error));
    }
    line
}

fn format_outcome(outcome: &JobOutcome) -> String {
    let mut parts = Vec::new();
    if let Some(ref job_id) = outcome.job_id {
        parts.push(job_id.clone());
    }
    if let Some(ref reason) = outcome.reason {
        parts.push(format!("reason: {}", reason));
    }
    if let Some(ref error) = outcome.error {
        parts.push(format!("error: {}", error));
    }
    if let Some(ref progress) = outcome.progress {
        parts.push(format_progress(progress));
    }
    parts.join(" ")
}

/// One text line for an event.
pub fn format_event(event: &FeedEvent, palette: &Palette) -> String {
    let tag = palette.header(event.kind().as_str());
    let body = match event {
        FeedEvent::Progress(progress) => format_progress(progress),
        FeedEvent::StateChanged(t) => {
            let mut body = format!(
                "{} -> {}",
                palette.job_state(t.prior_state),
                palette.job_state(t.new_state)
            );
            if let Some(ref reason) = t.reason {
                body.push_str(&format!(" ({})", reason));
            }
            body
        }
        FeedEvent::VideoCreated(v)
        | FeedEvent::VideoUpdated(v)
        | FeedEvent::VideoCompleted(v)
        | FeedEvent::VideoFailed(v) => format_video(v, palette),
        FeedEvent::JobCompleted(o) | FeedEvent::JobFailed(o) | FeedEvent::JobCanceled(o) => {
            format_outcome(o)
        }
        FeedEvent::Pong => String::new(),
    };
    if body.is_empty() {
        tag
    } else {
        format!("{} {}", tag, body)
    }
}

/// JSON object for an event: `{"type": ..., "data": ...}`.
pub fn event_json(event: &FeedEvent) -> Result<Value> {
    let data = match event {
        FeedEvent::Progress(p) => serde_json::to_value(p)?,
        FeedEvent::StateChanged(t) => serde_json::to_value(t)?,
        FeedEvent::VideoCreated(v)
        | FeedEvent::VideoUpdated(v)
        | FeedEvent::VideoCompleted(v)
        | FeedEvent::VideoFailed(v) => serde_json::to_value(v)?,
        FeedEvent::JobCompleted(o) | FeedEvent::JobFailed(o) | FeedEvent::JobCanceled(o) => {
            serde_json::to_value(o)?
        }
        FeedEvent::Pong => Value::Null,
    };
    Ok(json!({"type": event.kind().as_str(), "data": data}))
}

/// Final summary printed when a watch ends.
pub fn format_summary(tracker: &JobTracker, palette: &Palette) -> Vec<String> {
    let mut lines = Vec::new();
    let state = tracker
        .state()
        .map(|s| palette.job_state(s))
        .unwrap_or_else(|| palette.context("unknown"));
    match tracker.progress() {
        Some(progress) => lines.push(format!("job {}: {}", state, format_progress(progress))),
        None => lines.push(format!("job {}", state)),
    }
    for video in tracker.videos() {
        if video.state.is_terminal() && video.error.is_none() {
            continue;
        }
        lines.push(format!("  {}", format_video(video, palette)));
    }
    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;

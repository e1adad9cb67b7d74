// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Consumer-side aggregate of a job's feed.
//!
//! Folds [`FeedEvent`]s into the latest known view of a job: counters,
//! state, per-video progress and the final outcome. Video updates are
//! upserts keyed by video id, so replays after a reconnect are harmless.

use std::collections::HashMap;

use crate::event::FeedEvent;
use crate::progress::{JobOutcome, JobProgress, JobState, VideoProgress};

/// Latest known state of a single job.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    progress: Option<JobProgress>,
    state: Option<JobState>,
    videos: HashMap<String, VideoProgress>,
    outcome: Option<JobOutcome>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the view.
    pub fn apply(&mut self, event: &FeedEvent) {
        match event {
            FeedEvent::Progress(progress) => {
                self.progress = Some(progress.clone());
            }
            FeedEvent::StateChanged(transition) => {
                self.state = Some(transition.new_state);
            }
            FeedEvent::VideoCreated(video)
            | FeedEvent::VideoUpdated(video)
            | FeedEvent::VideoCompleted(video)
            | FeedEvent::VideoFailed(video) => {
                self.videos.insert(video.id.clone(), video.clone());
            }
            FeedEvent::JobCompleted(outcome) => self.finish(JobState::Completed, outcome),
            FeedEvent::JobFailed(outcome) => self.finish(JobState::Failed, outcome),
            FeedEvent::JobCanceled(outcome) => self.finish(JobState::Canceled, outcome),
            FeedEvent::Pong => {}
        }
    }

    fn finish(&mut self, state: JobState, outcome: &JobOutcome) {
        self.state = Some(state);
        if let Some(ref progress) = outcome.progress {
            self.progress = Some(progress.clone());
        }
        self.outcome = Some(outcome.clone());
    }

    /// Latest counters snapshot.
    pub fn progress(&self) -> Option<&JobProgress> {
        self.progress.as_ref()
    }

    /// Latest known job state.
    pub fn state(&self) -> Option<JobState> {
        self.state
    }

    /// Outcome of a job-ending event, once one arrived.
    pub fn outcome(&self) -> Option<&JobOutcome> {
        self.outcome.as_ref()
    }

    /// True once the job reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.state.is_some_and(JobState::is_terminal)
    }

    pub fn video(&self, id: &str) -> Option<&VideoProgress> {
        self.videos.get(id)
    }

    /// All known videos, ordered by row index then id.
    ///
    /// Videos without a row index sort last.
    pub fn videos(&self) -> Vec<&VideoProgress> {
        let mut videos: Vec<_> = self.videos.values().collect();
        videos.sort_by(|a, b| {
            let key = |v: &VideoProgress| v.row_index.unwrap_or(u64::MAX);
            key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
        });
        videos
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

/// Expected escape sequence for a color code
fn expected_fg(code: u8) -> String {
    format!("\x1b[38;5;{}m", code)
}

#[test]
fn fg256_produces_correct_escape_sequence() {
    assert_eq!(fg256(0), "\x1b[38;5;0m");
    assert_eq!(fg256(74), "\x1b[38;5;74m");
    assert_eq!(fg256(255), "\x1b[38;5;255m");
}

#[test]
fn reset_sequence_is_correct() {
    assert_eq!(RESET, "\x1b[0m");
}

#[test]
fn disabled_palette_passes_text_through() {
    let palette = Palette::new(false);
    assert_eq!(palette.header("job.progress"), "job.progress");
    assert_eq!(palette.job_state(JobState::Failed), "failed");
    assert_eq!(palette.video_state(VideoState::Skipped), "skipped");
}

#[test]
fn enabled_palette_wraps_text() {
    let palette = Palette::new(true);
    assert_eq!(
        palette.header("job.progress"),
        format!("{}job.progress{}", expected_fg(codes::HEADER), RESET)
    );
    assert_eq!(
        palette.context("12:00:00"),
        format!("{}12:00:00{}", expected_fg(codes::CONTEXT), RESET)
    );
}

#[parameterized(
    completed = { JobState::Completed, codes::SUCCESS },
    failed = { JobState::Failed, codes::FAILURE },
    canceled = { JobState::Canceled, codes::MUTED },
    running = { JobState::Running, codes::LITERAL },
)]
fn job_state_colors(state: JobState, code: u8) {
    let painted = Palette::new(true).job_state(state);
    assert!(painted.starts_with(&expected_fg(code)));
    assert!(painted.contains(state.as_str()));
}

#[parameterized(
    completed = { VideoState::Completed, codes::SUCCESS },
    failed = { VideoState::Failed, codes::FAILURE },
    skipped = { VideoState::Skipped, codes::MUTED },
    processing = { VideoState::Processing, codes::LITERAL },
)]
fn video_state_colors(state: VideoState, code: u8) {
    let painted = Palette::new(true).video_state(state);
    assert!(painted.starts_with(&expected_fg(code)));
}

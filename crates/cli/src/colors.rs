// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for event output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use jf_core::{JobState, VideoState};

use crate::env;

/// ANSI 256-color codes
pub mod codes {
    /// Event type tags: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Ids and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Timestamps and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Completed states
    pub const SUCCESS: u8 = 114;
    /// Failed states
    pub const FAILURE: u8 = 174;
    /// Canceled and skipped states
    pub const MUTED: u8 = 180;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    // NO_COLOR=1 disables colors
    if env::no_color() {
        return false;
    }

    // COLOR=1 forces colors even without TTY
    if env::force_color() {
        return true;
    }

    // Default: enable colors only if stdout is a TTY
    std::io::stdout().is_terminal()
}

/// Format a 256-color ANSI escape sequence for foreground color.
fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    format!("{}{}{}", fg256(code), text, RESET)
}

/// Applies colors to output text, or passes it through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Palette { enabled }
    }

    /// Palette following the terminal and environment.
    pub fn detect() -> Self {
        Palette::new(should_colorize())
    }

    fn apply(&self, code: u8, text: &str) -> String {
        if self.enabled {
            paint(code, text)
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.apply(codes::HEADER, text)
    }

    pub fn literal(&self, text: &str) -> String {
        self.apply(codes::LITERAL, text)
    }

    pub fn context(&self, text: &str) -> String {
        self.apply(codes::CONTEXT, text)
    }

    pub fn job_state(&self, state: JobState) -> String {
        let code = match state {
            JobState::Completed => codes::SUCCESS,
            JobState::Failed => codes::FAILURE,
            JobState::Canceled => codes::MUTED,
            _ => codes::LITERAL,
        };
        self.apply(code, state.as_str())
    }

    pub fn video_state(&self, state: VideoState) -> String {
        let code = match state {
            VideoState::Completed => codes::SUCCESS,
            VideoState::Failed => codes::FAILURE,
            VideoState::Canceled | VideoState::Skipped => codes::MUTED,
            _ => codes::LITERAL,
        };
        self.apply(code, state.as_str())
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry policy for unplanned closes.
//!
//! Each unplanned close consumes one attempt and schedules a single retry a
//! fixed interval later. A successful open restores the full budget.

use std::time::Duration;

use tokio::time::Instant;

/// What the policy decided after an unplanned close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Auto-reconnect is turned off.
    Disabled,
    /// Retry number `attempt` fires after `delay`.
    Scheduled { attempt: u32, delay: Duration },
    /// No attempts remain.
    Exhausted { max: u32 },
}

/// Retry bookkeeping owned by the connection task.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    enabled: bool,
    interval: Duration,
    max_attempts: u32,
    attempts: u32,
    deadline: Option<Instant>,
}

impl ReconnectPolicy {
    pub fn new(enabled: bool, interval: Duration, max_attempts: u32) -> Self {
        ReconnectPolicy {
            enabled,
            interval,
            max_attempts,
            attempts: 0,
            deadline: None,
        }
    }

    /// Records an unplanned close and schedules the next retry, if any.
    pub fn on_unplanned_close(&mut self) -> ReconnectDecision {
        self.deadline = None;
        if !self.enabled {
            return ReconnectDecision::Disabled;
        }
        if self.attempts >= self.max_attempts {
            return ReconnectDecision::Exhausted {
                max: self.max_attempts,
            };
        }
        self.attempts += 1;
        self.deadline = Some(Instant::now() + self.interval);
        ReconnectDecision::Scheduled {
            attempt: self.attempts,
            delay: self.interval,
        }
    }

    /// The connection opened; the budget is restored.
    pub fn on_open(&mut self) {
        self.attempts = 0;
        self.deadline = None;
    }

    /// Drops the pending retry without touching the attempt count.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Restores a fresh budget and drops any pending retry.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.deadline = None;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves once the pending retry is due. Pends forever when none is.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Consumes the pending retry if it is due.
    pub fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

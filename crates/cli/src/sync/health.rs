// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness probing for an open connection.
//!
//! The monitor only keeps time; the connection task sends the probes and
//! decides what a stale connection means. The ticker is owned by the
//! monitor, so stopping it drops the timer outright.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Outcome of a health tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    /// Time to send the next probe.
    Probe,
    /// No frame arrived within the probe timeout.
    Stale,
}

#[derive(Debug)]
pub struct HealthMonitor {
    interval: Duration,
    timeout: Option<Duration>,
    ticker: Option<Interval>,
    /// Set when a probe went out and nothing has been received since.
    awaiting_since: Option<Instant>,
    sequence: u64,
}

impl HealthMonitor {
    /// A zero `interval` disables probing. A zero or absent `timeout`
    /// disables stale detection.
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        HealthMonitor {
            interval,
            timeout: timeout.filter(|t| !t.is_zero()),
            ticker: None,
            awaiting_since: None,
            sequence: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    /// Starts ticking. The first tick fires one interval from now.
    pub fn start(&mut self) {
        self.awaiting_since = None;
        if !self.is_enabled() {
            self.ticker = None;
            return;
        }
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    pub fn stop(&mut self) {
        self.ticker = None;
        self.awaiting_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Records an outgoing probe and returns its sequence number.
    pub fn record_probe(&mut self) -> u64 {
        self.sequence += 1;
        if self.timeout.is_some() && self.awaiting_since.is_none() {
            self.awaiting_since = Some(Instant::now());
        }
        self.sequence
    }

    /// Any inbound frame proves the connection is alive.
    pub fn observe_inbound(&mut self) {
        self.awaiting_since = None;
    }

    /// Waits for the next probe or stale deadline. Pends forever while stopped.
    pub async fn tick(&mut self) -> HealthCheck {
        let stale_at = match (self.timeout, self.awaiting_since) {
            (Some(timeout), Some(since)) => Some(since + timeout),
            _ => None,
        };
        let Some(ticker) = self.ticker.as_mut() else {
            return std::future::pending().await;
        };
        match stale_at {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = tokio::time::sleep_until(deadline) => HealthCheck::Stale,
                    _ = ticker.tick() => HealthCheck::Probe,
                }
            }
            None => {
                ticker.tick().await;
                HealthCheck::Probe
            }
        }
    }
}

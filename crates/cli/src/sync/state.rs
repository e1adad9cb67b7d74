// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observable connection state.
//!
//! Written only by the connection task and published to consumers through a
//! `tokio::sync::watch` channel.

use jf_core::Envelope;
use thiserror::Error;

/// Lifecycle phase of the feed connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// No socket and no retry pending.
    #[default]
    Disconnected,
    /// Open attempt in flight.
    Connecting,
    /// Socket open.
    Connected,
    /// Socket lost; retry `attempt` is scheduled.
    Reconnecting { attempt: u32 },
    /// Client shut down. Terminal.
    Closed,
}

impl ConnectionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Reconnecting { .. } => "reconnecting",
            ConnectionPhase::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a [`FeedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid options; no socket attempt was made.
    Configuration,
    /// A frame could not be decoded. The socket stays open.
    Decode,
    /// Socket-level failure.
    Transport,
    /// The retry budget is spent.
    ExhaustedRetries,
}

/// Errors surfaced through [`ConnectionState::error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("job id is required")]
    MissingJobId,

    #[error("token is required")]
    MissingToken,

    #[error("invalid feed url: {0}")]
    InvalidUrl(String),

    #[error("failed to decode message: {0}")]
    Decode(String),

    #[error("connection error: {0}")]
    Transport(String),

    #[error("server did not respond to liveness probe")]
    ProbeTimeout,

    #[error("maximum reconnection attempts reached")]
    MaxReconnectAttempts { max: u32 },
}

impl FeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::MissingJobId | FeedError::MissingToken | FeedError::InvalidUrl(_) => {
                ErrorKind::Configuration
            }
            FeedError::Decode(_) => ErrorKind::Decode,
            FeedError::Transport(_) | FeedError::ProbeTimeout => ErrorKind::Transport,
            FeedError::MaxReconnectAttempts { .. } => ErrorKind::ExhaustedRetries,
        }
    }

    /// True when the client will not recover without an explicit `connect()`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::ExhaustedRetries
        )
    }
}

/// Snapshot of the connection as seen by consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    /// Most recent error. Cleared on a successful open or a new `connect()`.
    pub error: Option<FeedError>,
    /// Most recently received envelope, of any type.
    pub last_message: Option<Envelope>,
    /// Stable for the lifetime of the client.
    pub connection_id: String,
    /// Unplanned closes since the last successful open.
    pub reconnect_attempts: u32,
}

impl ConnectionState {
    pub fn new(connection_id: impl Into<String>) -> Self {
        ConnectionState {
            connection_id: connection_id.into(),
            ..ConnectionState::default()
        }
    }

    pub fn connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    pub fn connecting(&self) -> bool {
        self.phase == ConnectionPhase::Connecting
    }

    /// One-line human readable status.
    pub fn status_string(&self) -> String {
        match (&self.phase, &self.error) {
            (ConnectionPhase::Reconnecting { attempt }, _) => {
                format!("reconnecting (attempt {})", attempt)
            }
            (phase, Some(err)) => format!("{}: {}", phase, err),
            (phase, None) => phase.to_string(),
        }
    }
}

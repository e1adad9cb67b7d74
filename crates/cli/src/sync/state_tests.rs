// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the connection state module.

#![allow(clippy::unwrap_used)]

use super::state::{ConnectionPhase, ConnectionState, ErrorKind, FeedError};
use yare::parameterized;

#[parameterized(
    disconnected = { ConnectionPhase::Disconnected, false, false },
    connecting = { ConnectionPhase::Connecting, false, true },
    connected = { ConnectionPhase::Connected, true, false },
    reconnecting = { ConnectionPhase::Reconnecting { attempt: 2 }, false, false },
    closed = { ConnectionPhase::Closed, false, false },
)]
fn connected_and_connecting_are_exclusive(phase: ConnectionPhase, connected: bool, connecting: bool) {
    let state = ConnectionState {
        phase,
        ..ConnectionState::new("conn-1")
    };
    assert_eq!(state.connected(), connected);
    assert_eq!(state.connecting(), connecting);
    assert!(!(state.connected() && state.connecting()));
}

#[test]
fn new_state_is_disconnected() {
    let state = ConnectionState::new("conn-1");
    assert_eq!(state.phase, ConnectionPhase::Disconnected);
    assert_eq!(state.connection_id, "conn-1");
    assert_eq!(state.error, None);
    assert_eq!(state.last_message, None);
    assert_eq!(state.reconnect_attempts, 0);
}

#[test]
fn exhausted_message_is_stable() {
    let err = FeedError::MaxReconnectAttempts { max: 5 };
    assert_eq!(err.to_string(), "maximum reconnection attempts reached");
}

#[parameterized(
    missing_job = { FeedError::MissingJobId, ErrorKind::Configuration, true },
    missing_token = { FeedError::MissingToken, ErrorKind::Configuration, true },
    bad_url = { FeedError::InvalidUrl("http://x".into()), ErrorKind::Configuration, true },
    decode = { FeedError::Decode("eof".into()), ErrorKind::Decode, false },
    transport = { FeedError::Transport("reset".into()), ErrorKind::Transport, false },
    probe_timeout = { FeedError::ProbeTimeout, ErrorKind::Transport, false },
    exhausted = { FeedError::MaxReconnectAttempts { max: 3 }, ErrorKind::ExhaustedRetries, true },
)]
fn error_kinds(err: FeedError, kind: ErrorKind, terminal: bool) {
    assert_eq!(err.kind(), kind);
    assert_eq!(err.is_terminal(), terminal);
}

#[test]
fn status_string() {
    let mut state = ConnectionState::new("conn-1");
    assert_eq!(state.status_string(), "disconnected");

    state.phase = ConnectionPhase::Reconnecting { attempt: 3 };
    state.error = Some(FeedError::Transport("reset".into()));
    assert_eq!(state.status_string(), "reconnecting (attempt 3)");

    state.phase = ConnectionPhase::Disconnected;
    state.error = Some(FeedError::MaxReconnectAttempts { max: 3 });
    assert_eq!(
        state.status_string(),
        "disconnected: maximum reconnection attempts reached"
    );
}

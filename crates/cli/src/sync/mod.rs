// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live job progress feed.
//!
//! Provides the WebSocket client that keeps one job's feed connected and
//! fans its events out to consumer callbacks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ commands ┌──────────────────┐     ┌─────────────┐
//! │ FeedClient  │─────────►│  ConnectionTask  │────►│  Transport  │◄──► server
//! │  (handle)   │◄─────────│ policy · health  │◄────│   (trait)   │
//! └─────────────┘  watch   └──────────────────┘     └─────────────┘
//!                                   │
//!                                   ▼
//!                           ┌──────────────┐
//!                           │ MessageRouter│──► Handlers, history
//!                           └──────────────┘
//! ```
//!
//! # Features
//!
//! - Bounded automatic reconnect at a fixed interval
//! - Liveness probes while connected, with optional stale detection
//! - Typed callbacks per event type
//! - Bounded history of received envelopes
//! - Injectable transport trait for testing

mod client;
mod health;
mod options;
mod reconnect;
mod router;
mod state;
mod transport;

pub use client::FeedClient;
pub use health::{HealthCheck, HealthMonitor};
pub use options::{
    ClientOptions, DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_PROBE_INTERVAL,
    DEFAULT_RECONNECT_INTERVAL, DEFAULT_URL,
};
pub use reconnect::{ReconnectDecision, ReconnectPolicy};
pub use router::{Callback, Handlers, MessageRouter, RouteOutcome, SharedHistory};
pub use state::{ConnectionPhase, ConnectionState, ErrorKind, FeedError};
pub use transport::{
    CloseInfo, Frame, Transport, TransportError, TransportFuture, TransportResult,
    WebSocketTransport,
};

#[cfg(test)]
pub(crate) mod test_helpers;






#[cfg(test)]
mod state_tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Feed client for a single job's progress stream.
//!
//! [`FeedClient`] is a cheap handle onto a spawned connection task. The task
//! exclusively owns the transport, the reconnect deadline, the health ticker
//! and the state, and multiplexes them with consumer commands in one
//! `select!` loop. Consumers observe the state read-only through a watch
//! channel.

use chrono::Utc;
use jf_core::Envelope;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::id::generate_connection_id;

use super::health::{HealthCheck, HealthMonitor};
use super::options::ClientOptions;
use super::reconnect::{ReconnectDecision, ReconnectPolicy};
use super::router::{Handlers, MessageRouter, RouteOutcome, SharedHistory};
use super::state::{ConnectionPhase, ConnectionState, FeedError};
use super::transport::{CloseInfo, Frame, Transport, TransportError, TransportResult, WebSocketTransport};

/// Requests from the handle to the connection task.
enum Command {
    Connect { done: oneshot::Sender<()> },
    Disconnect { done: oneshot::Sender<()> },
    Send { text: String, reply: oneshot::Sender<bool> },
}

/// Handle to a job feed connection.
///
/// Dropping the handle tears the connection down; [`FeedClient::shutdown`]
/// does the same and waits for it.
pub struct FeedClient {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    history: SharedHistory,
    connection_id: String,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FeedClient {
    /// Create a client over a real WebSocket.
    ///
    /// Must be called from within a tokio runtime. No connection is made
    /// until [`connect`](Self::connect).
    pub fn new(options: ClientOptions, handlers: Handlers) -> Self {
        Self::with_transport(options, handlers, WebSocketTransport::new())
    }

    /// Create a client with a custom transport (for testing).
    pub fn with_transport<T: Transport>(
        options: ClientOptions,
        handlers: Handlers,
        transport: T,
    ) -> Self {
        let connection_id = generate_connection_id(&options.job_id, &Utc::now());
        let history = SharedHistory::new(options.history_capacity);
        let (state_tx, state_rx) = watch::channel(ConnectionState::new(connection_id.clone()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let task = ConnectionTask {
            policy: ReconnectPolicy::new(
                options.auto_reconnect,
                options.reconnect_interval,
                options.max_reconnect_attempts,
            ),
            health: HealthMonitor::new(options.probe_interval, options.probe_timeout),
            router: MessageRouter::new(handlers, history.clone()),
            connection_id: connection_id.clone(),
            options,
            transport,
            state: state_tx,
            commands: cmd_rx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(task.run());

        FeedClient {
            commands: cmd_tx,
            state: state_rx,
            history,
            connection_id,
            shutdown,
            task: Some(task),
        }
    }

    /// Open the connection.
    ///
    /// Resolves once the open attempt is settled: connected, or failed and
    /// handed to the retry policy. Errors land in [`ConnectionState::error`].
    pub async fn connect(&self) {
        let (done, rx) = oneshot::channel();
        if self.commands.send(Command::Connect { done }).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Close the connection and cancel any pending retry. Idempotent.
    pub async fn disconnect(&self) {
        let (done, rx) = oneshot::channel();
        if self.commands.send(Command::Disconnect { done }).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Send a JSON message to the server.
    ///
    /// Returns true when the frame was handed to the socket. Never fails
    /// otherwise; when disconnected the message is dropped.
    pub async fn send_message<M: Serialize + ?Sized>(&self, message: &M) -> bool {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode outbound message");
                return false;
            }
        };
        if !self.is_connected() {
            tracing::debug!("not connected, dropping outbound message");
            return false;
        }
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Send { text, reply }).is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected()
    }

    pub fn error(&self) -> Option<FeedError> {
        self.state.borrow().error.clone()
    }

    pub fn last_message(&self) -> Option<Envelope> {
        self.state.borrow().last_message.clone()
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Received envelopes, oldest first.
    pub fn message_history(&self) -> Vec<Envelope> {
        self.history.snapshot()
    }

    pub fn clear_message_history(&self) {
        self.history.clear();
    }

    /// Disconnect and stop the connection task.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "connection task failed");
            }
        }
    }
}

impl Drop for FeedClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// How an open attempt ended.
enum OpenOutcome {
    Finished(TransportResult<()>),
    Disconnected(oneshot::Sender<()>),
    ShutDown,
}

struct ConnectionTask<T: Transport> {
    options: ClientOptions,
    connection_id: String,
    transport: T,
    router: MessageRouter,
    policy: ReconnectPolicy,
    health: HealthMonitor,
    state: watch::Sender<ConnectionState>,
    commands: mpsc::UnboundedReceiver<Command>,
    shutdown: CancellationToken,
}

impl<T: Transport> ConnectionTask<T> {
    async fn run(mut self) {
        loop {
            // A failed send drops the socket without a close frame
            if self.state.borrow().connected() && !self.transport.is_connected() {
                self.on_close(CloseInfo::abnormal("connection lost"));
            }

            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },

                _ = self.policy.expired() => {
                    if self.policy.take_due() {
                        tracing::info!(
                            attempt = self.policy.attempts(),
                            max = self.policy.max_attempts(),
                            "reconnecting"
                        );
                        self.open().await;
                    }
                }

                check = self.health.tick() => self.on_health(check).await,

                frame = self.transport.recv(), if self.transport.is_connected() => {
                    self.on_frame(frame).await;
                }
            }
        }

        self.disconnect().await;
        self.update(|s| s.phase = ConnectionPhase::Closed);
        tracing::debug!(connection_id = %self.connection_id, "connection task stopped");
    }

    fn update(&self, f: impl FnOnce(&mut ConnectionState)) {
        self.state.send_modify(f);
    }

    fn set_error(&self, error: FeedError) {
        self.update(|s| s.error = Some(error));
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Connect { done } => {
                self.connect().await;
                let _ = done.send(());
            }
            Command::Disconnect { done } => {
                self.disconnect().await;
                let _ = done.send(());
            }
            Command::Send { text, reply } => {
                let _ = reply.send(self.send(text).await);
            }
        }
    }

    async fn connect(&mut self) {
        if self.transport.is_connected() {
            tracing::debug!("already connected");
            return;
        }
        if let Err(e) = self.options.validate() {
            tracing::warn!(error = %e, "not connecting");
            self.policy.cancel();
            self.update(|s| {
                s.phase = ConnectionPhase::Disconnected;
                s.error = Some(e);
            });
            return;
        }

        self.policy.reset();
        self.update(|s| {
            s.error = None;
            s.reconnect_attempts = 0;
        });
        self.open().await;
    }

    /// Makes one open attempt. Commands arriving meanwhile are handled
    /// without blocking on the attempt.
    async fn open(&mut self) {
        let url = match self.options.socket_url(&self.connection_id) {
            Ok(url) => url,
            Err(e) => {
                self.update(|s| {
                    s.phase = ConnectionPhase::Disconnected;
                    s.error = Some(e);
                });
                return;
            }
        };

        self.update(|s| s.phase = ConnectionPhase::Connecting);
        tracing::info!(
            job_id = %self.options.job_id,
            connection_id = %self.connection_id,
            url = %self.options.url,
            "connecting"
        );

        let mut waiters = Vec::new();
        let outcome = {
            let mut attempt = self.transport.connect(&url);
            loop {
                tokio::select! {
                    biased;

                    _ = self.shutdown.cancelled() => break OpenOutcome::ShutDown,

                    cmd = self.commands.recv() => match cmd {
                        Some(Command::Connect { done }) => waiters.push(done),
                        Some(Command::Disconnect { done }) => break OpenOutcome::Disconnected(done),
                        Some(Command::Send { reply, .. }) => {
                            let _ = reply.send(false);
                        }
                        None => break OpenOutcome::ShutDown,
                    },

                    result = &mut attempt => break OpenOutcome::Finished(result),
                }
            }
        };

        match outcome {
            OpenOutcome::Finished(Ok(())) => self.on_open().await,
            OpenOutcome::Finished(Err(e)) => self.on_open_failed(e),
            OpenOutcome::Disconnected(done) => {
                tracing::debug!("open attempt interrupted by disconnect");
                self.disconnect().await;
                let _ = done.send(());
            }
            OpenOutcome::ShutDown => {}
        }

        for done in waiters {
            let _ = done.send(());
        }
    }

    async fn on_open(&mut self) {
        self.policy.on_open();
        self.health.start();
        self.update(|s| {
            s.phase = ConnectionPhase::Connected;
            s.error = None;
            s.reconnect_attempts = 0;
        });
        tracing::info!(job_id = %self.options.job_id, "connected");
        self.send_probe().await;
    }

    /// A socket that errors before opening is handled like an abnormal close.
    fn on_open_failed(&mut self, error: TransportError) {
        tracing::warn!(error = %error, "failed to connect");
        self.set_error(FeedError::Transport(error.to_string()));
        self.on_close(CloseInfo::abnormal(error.to_string()));
    }

    async fn on_frame(&mut self, frame: TransportResult<Frame>) {
        match frame {
            Ok(Frame::Text(text)) => self.on_text(&text),
            Ok(Frame::Closed(close)) => self.on_close(close),
            Err(e) => {
                tracing::warn!(error = %e, "transport error");
                self.set_error(FeedError::Transport(e.to_string()));
                let _ = self.transport.close(CloseInfo::abnormal(e.to_string())).await;
                self.on_close(CloseInfo::abnormal(e.to_string()));
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        self.health.observe_inbound();

        let envelope = match Envelope::from_json(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, len = text.len(), "failed to decode message");
                self.set_error(FeedError::Decode(e.to_string()));
                return;
            }
        };

        self.update(|s| s.last_message = Some(envelope.clone()));
        match self.router.route(&envelope) {
            RouteOutcome::Rejected(err) => self.set_error(err),
            outcome => tracing::trace!(?outcome, "routed"),
        }
    }

    /// The socket is gone. Decides whether a retry follows.
    fn on_close(&mut self, close: CloseInfo) {
        self.health.stop();

        if close.is_normal() {
            tracing::info!(code = close.code, reason = %close.reason, "connection closed");
            self.policy.cancel();
            self.update(|s| s.phase = ConnectionPhase::Disconnected);
            return;
        }

        tracing::warn!(code = close.code, reason = %close.reason, "connection lost");
        match self.policy.on_unplanned_close() {
            ReconnectDecision::Disabled => {
                self.update(|s| s.phase = ConnectionPhase::Disconnected);
            }
            ReconnectDecision::Scheduled { attempt, delay } => {
                tracing::info!(
                    attempt,
                    max = self.policy.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "scheduling reconnect"
                );
                self.update(|s| {
                    s.phase = ConnectionPhase::Reconnecting { attempt };
                    s.reconnect_attempts = attempt;
                });
            }
            ReconnectDecision::Exhausted { max } => {
                tracing::error!(max, "maximum reconnection attempts reached");
                self.update(|s| {
                    s.phase = ConnectionPhase::Disconnected;
                    s.error = Some(FeedError::MaxReconnectAttempts { max });
                });
            }
        }
    }

    async fn on_health(&mut self, check: HealthCheck) {
        match check {
            HealthCheck::Probe => self.send_probe().await,
            HealthCheck::Stale => {
                tracing::warn!("liveness probe timed out");
                let close = CloseInfo::new(CloseInfo::PROBE_TIMEOUT, "liveness probe timed out");
                let _ = self.transport.close(close.clone()).await;
                self.set_error(FeedError::ProbeTimeout);
                self.on_close(close);
            }
        }
    }

    async fn send_probe(&mut self) {
        if !self.health.is_enabled() || !self.transport.is_connected() {
            return;
        }
        let seq = self.health.record_probe();
        let probe = Envelope::probe(format!("{}:{}", self.connection_id, seq));
        let text = match probe.to_json() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode probe");
                return;
            }
        };
        match self.transport.send(text).await {
            Ok(()) => tracing::debug!(seq, "probe sent"),
            Err(e) => tracing::warn!(error = %e, "failed to send probe"),
        }
    }

    async fn send(&mut self, text: String) -> bool {
        if !self.state.borrow().connected() || !self.transport.is_connected() {
            tracing::debug!("not connected, dropping outbound message");
            return false;
        }
        match self.transport.send(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to send message");
                false
            }
        }
    }

    /// Manual close. Never followed by a retry.
    async fn disconnect(&mut self) {
        self.policy.cancel();
        self.health.stop();
        if self.transport.is_connected() {
            if let Err(e) = self.transport.close(CloseInfo::manual()).await {
                tracing::debug!(error = %e, "close failed");
            }
            tracing::info!("disconnected");
        }
        self.update(|s| s.phase = ConnectionPhase::Disconnected);
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for WebSocket communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Transports move raw text frames; envelope decoding happens in the client
//! so a malformed frame never tears down the socket.

use std::future::Future;
use std::pin::Pin;

use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation on a transport that is not connected.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Close code and reason of a finished connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
}

impl CloseInfo {
    /// Intentional close. Never followed by a reconnect.
    pub const NORMAL: u16 = 1000;
    /// Close frame without a status code.
    pub const NO_STATUS: u16 = 1005;
    /// Connection dropped without a close handshake.
    pub const ABNORMAL: u16 = 1006;
    /// Client gave up on an unresponsive server.
    pub const PROBE_TIMEOUT: u16 = 4000;

    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        CloseInfo {
            code,
            reason: reason.into(),
        }
    }

    /// The close sent by an explicit disconnect.
    pub fn manual() -> Self {
        CloseInfo::new(CloseInfo::NORMAL, "manual disconnect")
    }

    pub fn abnormal(reason: impl Into<String>) -> Self {
        CloseInfo::new(CloseInfo::ABNORMAL, reason)
    }

    /// True when the close was intentional.
    pub fn is_normal(&self) -> bool {
        self.code == CloseInfo::NORMAL
    }
}

/// An inbound event from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text frame.
    Text(String),
    /// The connection closed. The transport is disconnected afterwards.
    Closed(CloseInfo),
}

/// Transport trait for WebSocket-like communication.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations. A transport is reusable:
/// `connect` may be called again after the previous connection closed.
pub trait Transport: Send + 'static {
    /// Connect to a remote server.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Close the connection with the given code. No-op when not connected.
    fn close(&mut self, close: CloseInfo) -> TransportFuture<'_, ()>;

    /// Send a text frame.
    fn send(&mut self, text: String) -> TransportFuture<'_, ()>;

    /// Receive the next frame.
    ///
    /// Must be cancel-safe: dropping the future before completion must not
    /// lose a frame.
    fn recv(&mut self) -> TransportFuture<'_, Frame>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    /// The WebSocket connection, if connected.
    ws: Option<WebSocketConnection>,
}

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport { ws: None }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
            Ok(())
        })
    }

    fn close(&mut self, close: CloseInfo) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            if let Some(mut ws) = self.ws.take() {
                let frame = CloseFrame {
                    code: CloseCode::from(close.code),
                    reason: close.reason.into(),
                };
                // The peer may already be gone; the connection is dropped either way.
                let _ = ws.sink.send(Message::Close(Some(frame))).await;
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn send(&mut self, text: String) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = ws.sink.send(Message::Text(text.into())).await {
                // Connection is broken, clear it
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Frame> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Frame::Text(text.to_string()));
                    }
                    Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                        Ok(text) => return Ok(Frame::Text(text)),
                        Err(_) => {
                            tracing::warn!(len = data.len(), "ignoring non-UTF-8 binary frame");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        // Connection closed, clear it
                        self.ws = None;
                        let info = match frame {
                            Some(f) => CloseInfo::new(u16::from(f.code), f.reason.to_string()),
                            None => CloseInfo::new(CloseInfo::NO_STATUS, ""),
                        };
                        return Ok(Frame::Closed(info));
                    }
                    Some(Ok(_)) => {
                        // Protocol-level ping/pong is answered by tungstenite
                        continue;
                    }
                    Some(Err(e)) => {
                        // Connection is broken, clear it
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => {
                        // Stream ended, clear connection
                        self.ws = None;
                        return Ok(Frame::Closed(CloseInfo::abnormal("stream ended")));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

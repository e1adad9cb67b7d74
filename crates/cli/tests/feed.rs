// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the feed client against a real WebSocket server.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use jobfeed::sync::{ClientOptions, ConnectionPhase, FeedClient, Handlers};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

type Socket = WebSocketStream<TcpStream>;

/// One accepted connection and the request URI it was opened with.
struct Accepted {
    socket: Socket,
    uri: String,
}

/// Accepts WebSocket connections on an ephemeral port.
async fn spawn_server() -> (String, mpsc::UnboundedReceiver<Accepted>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let uri = Arc::new(Mutex::new(String::new()));
            let seen = Arc::clone(&uri);
            let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                *seen.lock().unwrap() = req.uri().to_string();
                Ok(resp)
            };
            let Ok(socket) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
                continue;
            };
            let uri = uri.lock().unwrap().clone();
            if tx.send(Accepted { socket, uri }).is_err() {
                break;
            }
        }
    });

    (format!("ws://{}/ws/jobs", addr), rx)
}

async fn accept(rx: &mut mpsc::UnboundedReceiver<Accepted>) -> Accepted {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for connection")
        .expect("server stopped")
}

/// Next text frame from the client, skipping control frames.
async fn next_text(socket: &mut Socket) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(10), socket.next())
            .await
            .expect("timed out waiting for message")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("valid json");
        }
    }
}

async fn send_json(socket: &mut Socket, value: serde_json::Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

fn options(url: &str) -> ClientOptions {
    ClientOptions {
        url: url.to_string(),
        reconnect_interval: Duration::from_millis(100),
        ..ClientOptions::new("job-42", "secret")
    }
}

fn progress_handlers() -> (Handlers, mpsc::UnboundedReceiver<u64>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on_progress(move |p| {
        let _ = tx.send(p.items_completed);
    });
    (handlers, rx)
}

#[tokio::test]
async fn test_client_receives_progress() {
    let (url, mut accepted) = spawn_server().await;
    let (handlers, mut progress) = progress_handlers();
    let client = FeedClient::new(options(&url), handlers);

    client.connect().await;
    assert!(client.is_connected());

    let Accepted { mut socket, uri } = accept(&mut accepted).await;
    assert!(uri.contains("job_id=job-42"));
    assert!(uri.contains("token=secret"));
    assert!(uri.contains(&format!("connection_id={}", client.connection_id())));

    // The first frame is the liveness probe
    let probe = next_text(&mut socket).await;
    assert_eq!(probe["type"], "ping");
    assert_eq!(
        probe["correlation_id"],
        format!("{}:1", client.connection_id())
    );

    send_json(
        &mut socket,
        json!({
            "type": "job.progress",
            "ts": "2026-10-16T12:00:00Z",
            "data": {"items_total": 10, "items_completed": 4, "items_pending": 6}
        }),
    )
    .await;

    let completed = tokio::time::timeout(Duration::from_secs(10), progress.recv())
        .await
        .expect("timed out waiting for progress")
        .expect("handlers dropped");
    assert_eq!(completed, 4);
    assert_eq!(client.message_history().len(), 1);
    assert_eq!(
        client.last_message().map(|m| m.kind),
        Some("job.progress".to_string())
    );

    client.shutdown().await;
}

#[tokio::test]
async fn test_client_reconnects_after_server_error_close() {
    let (url, mut accepted) = spawn_server().await;
    let (handlers, _progress) = progress_handlers();
    let client = FeedClient::new(options(&url), handlers);
    client.connect().await;

    let Accepted { mut socket, .. } = accept(&mut accepted).await;
    socket
        .close(Some(CloseFrame {
            code: CloseCode::Error,
            reason: "restarting".into(),
        }))
        .await
        .expect("close");

    // A second connection with the same connection id follows
    let Accepted { uri, .. } = accept(&mut accepted).await;
    assert!(uri.contains(&format!("connection_id={}", client.connection_id())));

    let mut states = client.subscribe();
    tokio::time::timeout(
        Duration::from_secs(10),
        states.wait_for(|s| s.phase == ConnectionPhase::Connected),
    )
    .await
    .expect("timed out waiting to reconnect")
    .expect("client stopped");

    client.shutdown().await;
}

#[tokio::test]
async fn test_server_normal_close_is_final() {
    let (url, mut accepted) = spawn_server().await;
    let (handlers, _progress) = progress_handlers();
    let client = FeedClient::new(options(&url), handlers);
    client.connect().await;

    let Accepted { mut socket, .. } = accept(&mut accepted).await;
    socket
        .close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "job finished".into(),
        }))
        .await
        .expect("close");

    let mut states = client.subscribe();
    let state = tokio::time::timeout(
        Duration::from_secs(10),
        states.wait_for(|s| s.phase == ConnectionPhase::Disconnected),
    )
    .await
    .expect("timed out waiting for disconnect")
    .expect("client stopped")
    .clone();
    assert_eq!(state.error, None);

    // No reconnect is attempted
    let again = tokio::time::timeout(Duration::from_millis(500), accepted.recv()).await;
    assert!(again.is_err());

    client.shutdown().await;
}

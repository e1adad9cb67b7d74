// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests for the `jobfeed` binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use futures_util::{SinkExt, StreamExt};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

/// An isolated environment: empty config file, no inherited feed variables.
struct Env {
    _temp: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        Env {
            _temp: temp,
            config,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("jobfeed").unwrap();
        cmd.env_remove("JOBFEED_URL")
            .env_remove("JOBFEED_TOKEN")
            .env_remove("JOBFEED_LOG")
            .env("JOBFEED_CONFIG", &self.config)
            .env("NO_COLOR", "1");
        cmd
    }
}

/// Serves one connection that replays `frames`, then waits for the close.
async fn serve_once(frames: Vec<serde_json::Value>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            socket
                .send(Message::Text(frame.to_string().into()))
                .await
                .unwrap();
        }
        while let Some(Ok(msg)) = socket.next().await {
            if msg.is_close() {
                break;
            }
        }
    });
    format!("ws://{}/ws/jobs", addr)
}

#[test]
fn test_version() {
    Env::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("jobfeed "));
}

#[test]
fn test_watch_without_token_fails() {
    Env::new()
        .cmd()
        .args(["watch", "job-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token configured"));
}

#[test]
fn test_watch_rejects_http_url() {
    Env::new()
        .cmd()
        .args(["watch", "job-1", "--token", "abc", "--url", "http://localhost:8000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid url"));
}

#[test]
fn test_url_redacts_token() {
    Env::new()
        .cmd()
        .args(["url", "job-1", "--token", "s3cret", "--url", "wss://feed.example.com/ws"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "wss://feed.example.com/ws?job_id=job-1&token=redacted&connection_id=conn-",
        ))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn test_url_show_token_from_env() {
    Env::new()
        .cmd()
        .env("JOBFEED_TOKEN", "from-env")
        .args(["url", "job-1", "--show-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token=from-env"))
        .stdout(predicate::str::starts_with("ws://localhost:8000/ws/jobs?"));
}

#[test]
fn test_url_reads_config_file() {
    let env = Env::new();
    std::fs::write(
        &env.config,
        "url = \"wss://configured.example.com/ws\"\ntoken = \"file-token\"\n",
    )
    .unwrap();
    env.cmd()
        .args(["url", "job-1", "--show-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wss://configured.example.com/ws?"))
        .stdout(predicate::str::contains("token=file-token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_until_completed() {
    let url = serve_once(vec![
        json!({"type": "job.progress", "data": {"items_total": 2, "items_completed": 2}}),
        json!({"type": "job.completed", "data": {"job_id": "job-1"}}),
    ])
    .await;

    let env = Env::new();
    let mut cmd = env.cmd();
    cmd.args(["watch", "job-1", "--token", "abc", "--url", &url]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains("job.progress 2/2 (100%)"))
        .stdout(predicate::str::contains("job.completed job-1"))
        .stdout(predicate::str::contains("job completed: 2/2 (100%)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_failed_job_exits_nonzero() {
    let url = serve_once(vec![json!({
        "type": "job.failed",
        "data": {"job_id": "job-1", "error": "quota exceeded"}
    })])
    .await;

    let env = Env::new();
    let mut cmd = env.cmd();
    cmd.args(["watch", "job-1", "--token", "abc", "--url", &url, "-o", "json"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .failure()
        .stdout(predicate::str::contains("\"type\":\"job.failed\""))
        .stderr(predicate::str::contains("job job-1 ended: failed"));
}

#[test]
fn test_watch_unreachable_without_reconnect_fails() {
    // Bind then drop to get a port with nothing listening
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("ws://127.0.0.1:{}/ws/jobs", port);

    Env::new()
        .cmd()
        .args(["watch", "job-1", "--token", "abc", "--url", &url, "--no-reconnect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feed error"));
}

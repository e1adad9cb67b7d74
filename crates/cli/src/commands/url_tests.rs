// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use crate::id::is_connection_id;
use std::fs;
use tempfile::TempDir;

fn feed(dir: &TempDir, token: Option<&str>) -> FeedArgs {
    // An explicit empty config file keeps the user's real config out of the test
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();
    FeedArgs {
        token: token.map(str::to_string),
        url: Some("wss://feed.example.com/ws/jobs".to_string()),
        config: Some(path),
    }
}

fn query(url: &str) -> Vec<(String, String)> {
    Url::parse(url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn test_socket_url_redacts_token() {
    let temp = TempDir::new().unwrap();
    let url = socket_url("job-3", &feed(&temp, Some("s3cret")), false).unwrap();
    assert!(url.starts_with("wss://feed.example.com/ws/jobs?"));
    assert!(!url.contains("s3cret"));

    let pairs = query(&url);
    assert_eq!(pairs[0], ("job_id".to_string(), "job-3".to_string()));
    assert_eq!(pairs[1], ("token".to_string(), "redacted".to_string()));
    assert_eq!(pairs[2].0, "connection_id");
    assert!(is_connection_id(&pairs[2].1));
}

#[test]
fn test_socket_url_shows_token() {
    let temp = TempDir::new().unwrap();
    let url = socket_url("job-3", &feed(&temp, Some("s3cret")), true).unwrap();
    assert_eq!(query(&url)[1].1, "s3cret");
}

#[test]
fn test_socket_url_requires_token() {
    let temp = TempDir::new().unwrap();
    // JOBFEED_TOKEN may be set in the environment; only assert when it is not
    if crate::env::lookup(crate::env::vars::JOBFEED_TOKEN).is_none() {
        let err = socket_url("job-3", &feed(&temp, None), false).unwrap_err();
        assert!(matches!(err, Error::MissingToken));
    }
}

#[test]
fn test_redact_token_keeps_other_params() {
    let redacted = redact_token("ws://host/ws?job_id=j&token=abc%20def&connection_id=conn-1");
    assert_eq!(
        redacted,
        "ws://host/ws?job_id=j&token=redacted&connection_id=conn-1"
    );
}

#[test]
fn test_redact_token_passes_unparseable_through() {
    assert_eq!(redact_token("not a url"), "not a url");
}

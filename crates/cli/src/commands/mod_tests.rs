// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_flags_override_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "url = \"ws://file.example.com/ws\"\ntoken = \"file-token\"\nmax_reconnect_attempts = 2\n",
    )
    .unwrap();

    let feed = FeedArgs {
        token: Some("flag-token".to_string()),
        url: Some("wss://flag.example.com/ws".to_string()),
        config: Some(path),
    };
    let config = resolve_config(&feed).unwrap();
    assert_eq!(config.url, "wss://flag.example.com/ws");
    assert_eq!(config.token.as_deref(), Some("flag-token"));
    assert_eq!(config.max_reconnect_attempts, 2);
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    let feed = FeedArgs {
        config: Some(temp.path().join("absent.toml")),
        ..FeedArgs::default()
    };
    assert!(resolve_config(&feed).is_err());
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

#[test]
fn test_generate_connection_id() {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let id = generate_connection_id("job-1", &created_at);
    assert!(id.starts_with("conn-"));
    assert_eq!(id.len(), 21); // conn- + 16 hex chars
    assert!(is_connection_id(&id));
}

#[test]
fn test_generate_connection_id_unique_for_same_inputs() {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let a = generate_connection_id("job-1", &created_at);
    let b = generate_connection_id("job-1", &created_at);
    assert_ne!(a, b);
}

#[parameterized(
    valid = { "conn-0123456789abcdef", true },
    uppercase_hex = { "conn-0123456789ABCDEF", true },
    short = { "conn-0123", false },
    no_prefix = { "0123456789abcdef", false },
    not_hex = { "conn-0123456789abcdeg", false },
    empty = { "", false },
)]
fn test_is_connection_id(id: &str, expected: bool) {
    assert_eq!(is_connection_id(id), expected);
}

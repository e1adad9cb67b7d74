// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a connection ID for a feed client.
/// Format: conn-{hash} where hash is first 16 hex chars of
/// SHA256(job_id + timestamp + pid + counter).
///
/// Unique per client instance within a process, and across processes
/// started at the same instant.
pub fn generate_connection_id(job_id: &str, created_at: &DateTime<Utc>) -> String {
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}{}{}{}",
        job_id,
        created_at.to_rfc3339(),
        std::process::id(),
        seq
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("conn-{}", hex::encode(&hash[..8]))
}

/// Validate the shape of a connection ID.
pub fn is_connection_id(id: &str) -> bool {
    id.strip_prefix("conn-")
        .is_some_and(|hash| hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

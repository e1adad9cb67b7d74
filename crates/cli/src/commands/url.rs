// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use url::Url;

use crate::cli::FeedArgs;
use crate::error::Result;
use crate::id::generate_connection_id;

use super::resolve_config;

const REDACTED: &str = "redacted";

pub fn run(job_id: &str, feed: &FeedArgs, show_token: bool) -> Result<()> {
    println!("{}", socket_url(job_id, feed, show_token)?);
    Ok(())
}

/// The socket URL a watch of `job_id` would open, with a fresh connection id.
pub(crate) fn socket_url(job_id: &str, feed: &FeedArgs, show_token: bool) -> Result<String> {
    let options = resolve_config(feed)?.client_options(job_id)?;
    let connection_id = generate_connection_id(job_id, &Utc::now());
    let url = options.socket_url(&connection_id)?;
    Ok(if show_token { url } else { redact_token(&url) })
}

/// Replaces the `token` query parameter's value.
pub(crate) fn redact_token(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "token" { REDACTED.to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;

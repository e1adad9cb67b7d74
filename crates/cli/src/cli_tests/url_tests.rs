// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;

#[test]
fn test_url_command() {
    let cli = Cli::try_parse_from(["jobfeed", "url", "job-7", "--show-token"]).unwrap();
    assert!(!cli.command.verbose());
    match cli.command {
        Command::Url {
            job_id,
            feed,
            show_token,
        } => {
            assert_eq!(job_id, "job-7");
            assert_eq!(feed.token, None);
            assert!(show_token);
        }
        _ => panic!("Expected Url command"),
    }
}

#[test]
fn test_url_rejects_verbose() {
    assert!(Cli::try_parse_from(["jobfeed", "url", "job-7", "-v"]).is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["jobfeed"]).is_err());
}

//! Tests for extract and sweep parsing.

use super::parse;
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_extract() {
    match parse(&["hlx", "extract", "/path/to/page.har"]) {
        CliCommand::Extract { path, output } => {
            assert_eq!(path, "/path/to/page.har");
            assert!(output.is_none());
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_extract_output() {
    match parse(&["hlx", "extract", "x.har", "-o", "links.txt"]) {
        CliCommand::Extract { path, output } => {
            assert_eq!(path, "x.har");
            assert_eq!(output.as_deref(), Some(Path::new("links.txt")));
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_sweep() {
    match parse(&["hlx", "sweep"]) {
        CliCommand::Sweep { all } => assert!(!all),
        _ => panic!("expected Sweep"),
    }
    match parse(&["hlx", "sweep", "--all"]) {
        CliCommand::Sweep { all } => assert!(all),
        _ => panic!("expected Sweep --all"),
    }
}

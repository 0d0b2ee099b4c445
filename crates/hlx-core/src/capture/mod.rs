//! Capture (HAR) input: the request URLs recorded during a page load.
//!
//! Only the shape needed to reach each request URL is validated. A capture
//! without a `log.entries` list is rejected outright; individual entries that
//! lack a usable URL are skipped so the rest of the batch still counts.

mod parse;
mod read;

pub use read::{parse_capture, read_capture};

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEntry {
    pub url: String,
}

/// Parsed capture: usable entries in file order plus how many were dropped.
#[derive(Debug, Clone, Default)]
pub struct CaptureRecord {
    pub entries: Vec<CaptureEntry>,
    /// Entries with no `request.url` string.
    pub skipped: usize,
}

impl CaptureRecord {
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.url.as_str())
    }

    /// Total entries seen in the log, usable or not.
    pub fn total(&self) -> usize {
        self.entries.len() + self.skipped
    }
}

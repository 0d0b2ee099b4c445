//! Minimal HAR 1.2 structures. Only `log.entries[].request.url` is consumed.

use serde::Deserialize;
use serde_json::Value;

/// Root HAR log (top-level wrapper).
#[derive(Debug, Deserialize)]
pub(super) struct HarLog {
    pub log: HarRoot,
}

/// Entries stay as raw values so one bad entry does not sink the whole log.
#[derive(Debug, Deserialize)]
pub(super) struct HarRoot {
    pub entries: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HarEntry {
    pub request: HarRequest,
}

#[derive(Debug, Deserialize)]
pub(super) struct HarRequest {
    pub url: String,
}

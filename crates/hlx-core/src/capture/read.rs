//! Decode capture bytes into a [`CaptureRecord`].

use anyhow::{Context, Result};
use serde_json::error::Category;
use std::path::Path;

use crate::error::ExtractError;

use super::parse::{HarEntry, HarLog};
use super::{CaptureEntry, CaptureRecord};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses HAR content.
///
/// Fails with [`ExtractError::MalformedInput`] when the content is not JSON or
/// has no `log.entries` list. Entries without a string `request.url` are
/// skipped and counted in [`CaptureRecord::skipped`].
pub fn parse_capture(bytes: &[u8]) -> Result<CaptureRecord, ExtractError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let har: HarLog = serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        Category::Data => ExtractError::malformed(format!("expected a log.entries list: {e}")),
        _ => ExtractError::malformed(format!("not valid JSON: {e}")),
    })?;

    let mut entries = Vec::with_capacity(har.log.entries.len());
    let mut skipped = 0;
    for (index, raw) in har.log.entries.into_iter().enumerate() {
        match serde_json::from_value::<HarEntry>(raw) {
            Ok(entry) => entries.push(CaptureEntry {
                url: entry.request.url,
            }),
            Err(e) => {
                skipped += 1;
                tracing::debug!("skipping capture entry {}: {}", index, e);
            }
        }
    }

    Ok(CaptureRecord { entries, skipped })
}

/// Reads and parses a HAR file from disk.
pub fn read_capture(path: &Path) -> Result<CaptureRecord> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    let record =
        parse_capture(&bytes).with_context(|| format!("parse HAR file: {}", path.display()))?;
    Ok(record)
}

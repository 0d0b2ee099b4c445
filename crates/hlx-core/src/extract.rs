//! Capture bytes in, deduplicated large-image links out.

use std::path::Path;

use crate::capture::{parse_capture, read_capture, CaptureRecord};
use crate::error::ExtractError;
use crate::rewrite::{extract_and_rewrite, RewriteResult, SizeRewrite};

/// Outcome of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub result: RewriteResult,
    /// Entries in the capture, including skipped ones.
    pub total_entries: usize,
    /// Entries dropped because they had no request URL.
    pub skipped_entries: usize,
}

/// Parses `bytes` as a HAR capture and applies `rule` to every request URL.
pub fn extract_from_capture(bytes: &[u8], rule: &SizeRewrite) -> Result<Extraction, ExtractError> {
    let record = parse_capture(bytes)?;
    Ok(extract_from_record(&record, rule))
}

/// Same as [`extract_from_capture`], reading the capture from `path`.
pub fn extract_from_file(path: &Path, rule: &SizeRewrite) -> anyhow::Result<Extraction> {
    let record = read_capture(path)?;
    let extraction = extract_from_record(&record, rule);
    tracing::info!(
        "extract {}: {} links from {} entries",
        path.display(),
        extraction.result.count(),
        extraction.total_entries
    );
    Ok(extraction)
}

fn extract_from_record(record: &CaptureRecord, rule: &SizeRewrite) -> Extraction {
    let result = extract_and_rewrite(rule, record.urls());

    if record.skipped > 0 {
        tracing::warn!(
            "skipped {} of {} capture entries without a request url",
            record.skipped,
            record.total()
        );
    }
    tracing::debug!(
        "extracted {} links from {} entries",
        result.count(),
        record.total()
    );

    Extraction {
        result,
        total_entries: record.total(),
        skipped_entries: record.skipped,
    }
}

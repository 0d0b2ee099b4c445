//! Size-marker rewrite: promote small image links to their large variant.
//!
//! A URL is kept when it carries either the source marker (rewritten to the
//! target) or the target marker (kept as is). Everything else is dropped.
//! Survivors are deduplicated by exact string, keeping first-seen order.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default small-image path segment.
pub const SMALL_MARKER: &str = "/236x/";
/// Default large-image path segment.
pub const LARGE_MARKER: &str = "/736x/";

/// Which path segment to promote and what to promote it to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRewrite {
    pub source_marker: String,
    pub target_marker: String,
}

impl Default for SizeRewrite {
    fn default() -> Self {
        Self {
            source_marker: SMALL_MARKER.to_string(),
            target_marker: LARGE_MARKER.to_string(),
        }
    }
}

impl SizeRewrite {
    /// Rejects rules that would keep every URL or rewrite to itself.
    pub fn validate(&self) -> Result<()> {
        if self.source_marker.is_empty() || self.target_marker.is_empty() {
            bail!("rewrite markers must not be empty");
        }
        if self.source_marker == self.target_marker {
            bail!(
                "rewrite source and target markers are identical: {}",
                self.source_marker
            );
        }
        Ok(())
    }

    /// Classifies one URL.
    ///
    /// The source marker is checked first, so a URL holding both markers is
    /// rewritten. Only the first occurrence of the source marker is replaced.
    pub fn rewrite(&self, url: &str) -> Option<String> {
        if url.contains(&self.source_marker) {
            Some(url.replacen(&self.source_marker, &self.target_marker, 1))
        } else if url.contains(&self.target_marker) {
            Some(url.to_string())
        } else {
            None
        }
    }
}

/// Deduplicated rewritten links in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteResult {
    urls: Vec<String>,
}

impl RewriteResult {
    pub fn count(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Newline-joined body of the downloadable artifact (no trailing newline).
    pub fn to_text(&self) -> String {
        self.urls.join("\n")
    }
}

/// Runs `rule` over every URL and deduplicates the survivors.
pub fn extract_and_rewrite<I, S>(rule: &SizeRewrite, urls: I) -> RewriteResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for url in urls {
        let Some(rewritten) = rule.rewrite(url.as_ref()) else {
            continue;
        };
        if seen.insert(rewritten.clone()) {
            out.push(rewritten);
        }
    }
    RewriteResult { urls: out }
}

//! `hlx extract <path>` – run the link extraction on a local HAR file.

use anyhow::{Context, Result};
use hlx_core::config::HlxConfig;
use hlx_core::extract::{extract_from_file, Extraction};
use std::path::Path;

pub fn run_extract(cfg: &HlxConfig, path: &Path, output: Option<&Path>) -> Result<()> {
    let extraction = extract_file(cfg, path)?;
    let result = &extraction.result;
    for url in result.iter() {
        println!("{url}");
    }
    if extraction.skipped_entries > 0 {
        eprintln!(
            "Ignored {} of {} entries without a request URL.",
            extraction.skipped_entries, extraction.total_entries
        );
    }
    eprintln!("Found {} links.", result.count());

    if let Some(out) = output {
        std::fs::write(out, result.to_text())
            .with_context(|| format!("write {}", out.display()))?;
        eprintln!("Saved to {}", out.display());
    }
    Ok(())
}

pub(crate) fn extract_file(cfg: &HlxConfig, path: &Path) -> Result<Extraction> {
    extract_from_file(path, &cfg.rewrite_rule())
}

//! `hlx sweep` – clean up the work dir without running the server.

use anyhow::Result;
use hlx_core::artifact::ArtifactStore;
use hlx_core::config::HlxConfig;

pub async fn run_sweep(cfg: &HlxConfig, all: bool) -> Result<()> {
    let store = ArtifactStore::new(cfg.resolve_work_dir()?);
    let removed = if all {
        store.clear().await?
    } else {
        store.sweep(cfg.artifact_ttl()).await?
    };
    println!(
        "Removed {removed} request dir(s) from {}",
        store.root().display()
    );
    Ok(())
}

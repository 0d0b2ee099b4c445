//! Upload server: accepts a HAR capture, renders the extracted links, and
//! serves the link list as a one-shot download.
//!
//! Each upload works in its own request directory under the configured work
//! dir. A background task sweeps directories whose artifact was never
//! downloaded.

mod handlers;
pub mod render;
mod routes;

pub use handlers::{download_path, UPLOAD_FIELD};
pub use routes::create_router;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;

use crate::artifact::ArtifactStore;
use crate::config::HlxConfig;
use crate::rewrite::SizeRewrite;

/// Shared, read-only server state.
pub struct ServerState {
    pub config: HlxConfig,
    pub store: ArtifactStore,
    pub rule: SizeRewrite,
}

impl ServerState {
    pub fn new(config: HlxConfig, store: ArtifactStore) -> Self {
        let rule = config.rewrite_rule();
        Self {
            config,
            store,
            rule,
        }
    }
}

/// Serve on an already bound `listener` until Ctrl-C.
pub async fn run_server(config: HlxConfig, listener: TcpListener) -> Result<()> {
    config.validate()?;
    let work_dir = config.resolve_work_dir()?;
    let store = ArtifactStore::new(&work_dir);
    let state = Arc::new(ServerState::new(config.clone(), store.clone()));

    tracing::info!("Starting hlx server on {}", listener.local_addr()?);
    tracing::info!("Work dir: {}", work_dir.display());
    tracing::info!(
        "Rewrite: {} -> {}",
        state.rule.source_marker,
        state.rule.target_marker
    );

    let stale = store.sweep(config.artifact_ttl()).await?;
    if stale > 0 {
        tracing::info!("removed {} stale request dirs at startup", stale);
    }

    tokio::spawn(run_sweep_loop(
        store,
        config.sweep_interval(),
        config.artifact_ttl(),
    ));

    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("hlx server stopped");
    Ok(())
}

/// Periodically removes request directories older than `ttl`.
pub async fn run_sweep_loop(store: ArtifactStore, every: Duration, ttl: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; startup already swept.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(e) = store.sweep(ttl).await {
            tracing::error!("artifact sweep failed: {:#}", e);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

//! `hlx serve` – run the upload server.

use anyhow::{Context, Result};
use hlx_core::config::HlxConfig;
use hlx_core::server;
use std::net::SocketAddr;

pub async fn run_serve(mut cfg: HlxConfig, addr: SocketAddr) -> Result<()> {
    cfg.bind_addr = addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    println!("Server running on http://{}", listener.local_addr()?);
    server::run_server(cfg, listener).await
}

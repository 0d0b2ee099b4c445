//! CLI for hlx.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hlx_core::config;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use commands::{run_extract, run_serve, run_sweep};

/// Top-level CLI for hlx.
#[derive(Debug, Parser)]
#[command(name = "hlx")]
#[command(about = "hlx: lift large-image links out of HAR captures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the upload server.
    Serve {
        /// Address to listen on (overrides bind_addr from config).
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
        /// Port to listen on, keeping the configured host. Ignored with --bind.
        #[arg(long, env = "PORT", value_name = "PORT")]
        port: Option<u16>,
    },

    /// Extract large-image links from a HAR file and print them.
    Extract {
        /// Path to the HAR file.
        path: String,
        /// Also write the newline-joined list to this file.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Remove expired request directories from the work dir.
    Sweep {
        /// Remove every request directory, not only expired ones.
        #[arg(long)]
        all: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind, port } => {
                let addr = listen_addr(cfg.bind_addr, bind, port);
                run_serve(cfg, addr).await?;
            }
            CliCommand::Extract { path, output } => {
                run_extract(&cfg, Path::new(&path), output.as_deref())?;
            }
            CliCommand::Sweep { all } => run_sweep(&cfg, all).await?,
        }

        Ok(())
    }
}

/// `--bind` wins over `--port`; `--port` only replaces the configured port.
fn listen_addr(configured: SocketAddr, bind: Option<SocketAddr>, port: Option<u16>) -> SocketAddr {
    match (bind, port) {
        (Some(addr), _) => addr,
        (None, Some(port)) => SocketAddr::new(configured.ip(), port),
        (None, None) => configured,
    }
}

#[cfg(test)]
mod tests;

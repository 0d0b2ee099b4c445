use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rewrite::SizeRewrite;

/// Global configuration loaded from `~/.config/hlx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HlxConfig {
    /// Address the upload server listens on.
    pub bind_addr: SocketAddr,
    /// Largest accepted upload body in bytes.
    pub max_upload_bytes: usize,
    /// Age after which an undownloaded artifact is swept.
    pub artifact_ttl_secs: u64,
    /// How often the background sweep runs.
    pub sweep_interval_secs: u64,
    /// Per-request working directories live here (None = XDG cache dir).
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Optional marker override; if missing, `/236x/` -> `/736x/` is used.
    #[serde(default)]
    pub rewrite: Option<SizeRewrite>,
}

impl Default for HlxConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: 32 * 1024 * 1024,
            artifact_ttl_secs: 600,
            sweep_interval_secs: 60,
            work_dir: None,
            rewrite: None,
        }
    }
}

impl HlxConfig {
    pub fn rewrite_rule(&self) -> SizeRewrite {
        self.rewrite.clone().unwrap_or_default()
    }

    pub fn artifact_ttl(&self) -> Duration {
        Duration::from_secs(self.artifact_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    /// Configured work dir, or `~/.cache/hlx/uploads` (created if missing).
    pub fn resolve_work_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.work_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("create work dir {}", dir.display()))?;
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("hlx")?;
        Ok(xdg_dirs.create_cache_directory("uploads")?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }
        if let Some(rule) = &self.rewrite {
            rule.validate()?;
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hlx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HlxConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<HlxConfig> {
    if !path.exists() {
        let default_cfg = HlxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: HlxConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

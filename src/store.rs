//! On-disk CLI configuration: `config.json` for settings, `state.json` for
//! access tokens.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{AppConfig, AppState};

mod tokens;

/// Overrides the default config directory.
pub const HOME_ENV: &str = "ATPINS_HOME";

#[derive(Clone, Debug)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    /// `$ATPINS_HOME`, else the platform config dir plus `atpins`.
    pub fn default_root() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        dirs::config_dir()
            .map(|d| d.join("atpins"))
            .ok_or_else(|| anyhow!("no config directory on this platform (set {})", HOME_ENV))
    }

    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("create config dir {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` until `atpins login` has run.
    pub fn read_config(&self) -> Result<Option<AppConfig>> {
        let path = self.root.join("config.json");
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(Some(cfg))
    }

    pub fn write_config(&self, cfg: &AppConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        log::debug!("wrote {}", self.root.join("config.json").display());
        Ok(())
    }

    pub fn remove_config(&self) -> Result<()> {
        let path = self.root.join("config.json");
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
        Ok(())
    }

    pub fn read_state(&self) -> Result<AppState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(AppState::default());
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: AppState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &AppState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;

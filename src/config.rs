use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "aerial_gymnastics.db";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StudioConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub busy_timeout_ms: Option<u64>,
}

impl StudioConfig {
    /// Database path: CLI flag, then config file, then the default
    pub fn database_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    pub fn port(&self, flag: Option<u16>) -> u16 {
        flag.or(self.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("aerial.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<StudioConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read studio config {}", path.display()))?;
    let config: StudioConfig = toml::from_str(&contents)
        .with_context(|| format!("invalid studio config {} (expected database, port, busy_timeout_ms)", path.display()))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &StudioConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("studio config already exists at {} (rerun `init --force` to replace it)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)
        .with_context(|| format!("cannot write studio config {}", path.display()))?;
    Ok(())
}

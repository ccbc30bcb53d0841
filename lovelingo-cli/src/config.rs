use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Repository key for this install's data.
    pub user_id: String,
    /// tracing filter used when RUST_LOG is unset.
    pub log_filter: String,
    pub recommend: RecommendSection,
    pub watch: WatchSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendSection {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchSection {
    pub interval_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            log_filter: "warn".to_string(),
            recommend: RecommendSection::default(),
            watch: WatchSection::default(),
        }
    }
}

impl Default for RecommendSection {
    fn default() -> Self {
        Self {
            count: lovelingo_core::DEFAULT_COUNT as i64,
        }
    }
}

impl Default for WatchSection {
    fn default() -> Self {
        Self { interval_minutes: 60 }
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns true when written.
pub fn init_config(home: &Path) -> Result<bool> {
    if config_path(home).exists() {
        return Ok(false);
    }
    save_config(home, &Config::default())?;
    Ok(true)
}

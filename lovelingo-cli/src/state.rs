use anyhow::{anyhow, Context, Result};
use lovelingo_core::{Gender, LoveLanguage, Profile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `$LOVELINGO_HOME`, else `$HOME/.lovelingo`.
pub fn lovelingo_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LOVELINGO_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".lovelingo"))
}

pub fn ensure_lovelingo_home() -> Result<PathBuf> {
    let dir = lovelingo_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Who the user is planning for.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PartnerProfile {
    pub created_at_utc: Option<String>,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub primary: Option<LoveLanguage>,
    #[serde(default)]
    pub secondary: Option<LoveLanguage>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl PartnerProfile {
    /// The engine's view of the profile. Fails until a primary language is set.
    pub fn to_core(&self) -> Result<Profile> {
        let primary = self
            .primary
            .ok_or_else(|| anyhow!("No primary love language yet. Run: lovelingo profile quiz (or profile set --primary ...)"))?;
        Ok(Profile {
            primary,
            secondary: self.secondary.filter(|s| *s != primary),
            gender: self.gender,
        })
    }
}

pub fn profile_path(home: &Path) -> PathBuf {
    home.join("profile.json")
}

pub fn store_path(home: &Path) -> PathBuf {
    home.join("store.json")
}

pub fn write_profile(home: &Path, profile: &PartnerProfile) -> Result<()> {
    let p = profile_path(home);
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile(home: &Path) -> Result<PartnerProfile> {
    let p = profile_path(home);
    if !p.exists() {
        return Ok(PartnerProfile::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

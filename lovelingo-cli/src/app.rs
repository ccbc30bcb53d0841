use anyhow::Result;
use lovelingo_core::Planner;
use std::path::{Path, PathBuf};

use crate::config::{load_config, Config};
use crate::state::store_path;
use crate::store::FileRepository;

/// Everything a command needs: where data lives, config, and the planner.
pub struct App {
    pub home: PathBuf,
    pub config: Config,
    pub planner: Planner<FileRepository>,
}

impl App {
    pub fn open(home: &Path) -> Result<Self> {
        Self::with_config(home, load_config(home)?)
    }

    /// Open the store with an already loaded config.
    pub fn with_config(home: &Path, config: Config) -> Result<Self> {
        let repo = FileRepository::open(store_path(home))?;
        Ok(Self {
            home: home.to_path_buf(),
            config,
            planner: Planner::new(repo),
        })
    }

    pub fn user(&self) -> &str {
        &self.config.user_id
    }
}

//! Local settings for the orchestrator
//!
//! The list of repositories to scan, the bot login whose PRs are considered,
//! and the calendar inputs all come from a TOML file, by default at
//! `~/.config/dependamerge/config.toml`.

use crate::error::{Error, Result};
use crate::types::RepoId;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default bot author whose PRs are scanned
const DEFAULT_BOT_LOGIN: &str = "dependabot[bot]";

fn default_bot_login() -> String {
    DEFAULT_BOT_LOGIN.to_string()
}

fn default_skip_weekends() -> bool {
    true
}

/// One repository entry in the settings file
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryEntry {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

/// Parsed settings file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Login of the dependency-update bot
    #[serde(default = "default_bot_login")]
    pub bot_login: String,
    /// Treat Saturday/Sunday as non-working days
    #[serde(default = "default_skip_weekends")]
    pub skip_weekends: bool,
    /// Explicit non-working dates (ISO `YYYY-MM-DD`)
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Repositories to scan, in order
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

impl Settings {
    /// Repositories as [`RepoId`]s, preserving file order
    pub fn repo_ids(&self) -> Vec<RepoId> {
        self.repositories
            .iter()
            .map(|r| RepoId::new(r.owner.clone(), r.name.clone()))
            .collect()
    }
}

/// Default settings file location (`~/.config/dependamerge/config.toml`)
pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("dependamerge").join("config.toml"))
        .ok_or_else(|| Error::Settings("could not determine config directory".to_string()))
}

/// Load and validate settings from `path`
pub fn load(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Settings(format!("failed to read {}: {e}", path.display())))?;

    let settings: Settings = toml::from_str(&content)
        .map_err(|e| Error::Settings(format!("failed to parse {}: {e}", path.display())))?;

    if settings.bot_login.trim().is_empty() {
        return Err(Error::Settings("bot_login must not be empty".to_string()));
    }
    if settings.repositories.is_empty() {
        return Err(Error::Settings(format!(
            "no repositories configured in {}",
            path.display()
        )));
    }

    Ok(settings)
}

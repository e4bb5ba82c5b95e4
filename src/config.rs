//! Remote merge-policy document
//!
//! Each base repository opts into auto-merging by committing a YAML document
//! at a fixed path. The document is fetched fresh for every PR evaluation and
//! discarded once the verdict is computed; there is no cross-PR cache.

use serde::Deserialize;

/// Fixed path of the policy document within the base repository
pub const CONFIG_PATH: &str = ".github/auto-merge.yml";

/// The `api_version` value this build of the tool accepts
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One allowlist entry in the policy document
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntry {
    /// Dependency name
    pub dependency: String,
    /// Permitted bump magnitude labels (`major`, `minor`, `patch`, `unchanged`)
    pub allowed_semver_bumps: Vec<String>,
}

/// The parsed policy document
#[derive(Debug, Clone, Deserialize)]
pub struct MergePolicyConfig {
    /// Compatibility marker; must equal [`API_VERSION`] exactly
    pub api_version: String,
    /// Dependencies pre-approved for automatic merging
    #[serde(default)]
    pub auto_merge: Vec<AllowEntry>,
}

impl MergePolicyConfig {
    /// Whether this document was written for this build of the tool
    pub fn api_version_matches(&self) -> bool {
        self.api_version == API_VERSION
    }
}

/// Outcome of looking up and parsing a repository's policy document
///
/// Missing and malformed are distinct cases so the pipeline can report
/// distinct rejection reasons for them.
#[derive(Debug)]
pub enum ConfigLookup {
    /// Document exists and parsed
    Found(MergePolicyConfig),
    /// No document at [`CONFIG_PATH`]
    NotFound,
    /// Document exists but is not valid YAML for this schema
    Malformed(String),
}

/// Parse raw document content into a [`ConfigLookup`]
pub fn parse(content: &str) -> ConfigLookup {
    match serde_yaml::from_str::<MergePolicyConfig>(content) {
        Ok(config) => ConfigLookup::Found(config),
        Err(e) => ConfigLookup::Malformed(e.to_string()),
    }
}

/// Resolve a repository file lookup into a [`ConfigLookup`]
pub fn from_file_lookup(lookup: &crate::types::FileLookup) -> ConfigLookup {
    match lookup {
        crate::types::FileLookup::NotFound => ConfigLookup::NotFound,
        crate::types::FileLookup::Found(content) => parse(content),
    }
}

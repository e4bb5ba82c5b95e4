//! GitHub authentication
//!
//! Resolves a token from the environment, falling back to the `gh` CLI.
//! Token storage and refresh are out of scope.

use crate::error::{Error, Result};
use std::process::Command;

/// Source of the resolved token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from `GITHUB_TOKEN` or `GH_TOKEN`
    EnvVar,
    /// Token from `gh auth token`
    Cli,
}

/// A resolved GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The token value
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

/// Resolve a GitHub token: `GITHUB_TOKEN`, then `GH_TOKEN`, then `gh auth token`
pub fn get_github_auth() -> Result<AuthConfig> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(AuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|e| Error::Auth(format!("failed to run 'gh auth token': {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token in GITHUB_TOKEN/GH_TOKEN and 'gh auth token' failed; run 'gh auth login' or export a token".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("'gh auth token' returned an empty token".to_string()));
    }

    Ok(AuthConfig {
        token,
        source: AuthSource::Cli,
    })
}

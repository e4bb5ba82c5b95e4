//! Core types for dependamerge

use serde::{Deserialize, Serialize};

/// A repository the orchestrator scans, identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoId {
    /// Create a repo id from owner and name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` slug
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An open pull request as returned by the PR listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number
    pub number: u64,
    /// SHA of the head commit
    pub head_sha: String,
    /// Full name (`owner/name`) of the head repository
    pub head_repo: String,
    /// Full name (`owner/name`) of the base repository
    pub base_repo: String,
}

/// A commit entry from the PR commit listing (used only to count commits)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Commit SHA
    pub sha: String,
}

/// A file touched by a commit, with its unified diff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path of the file within the repository
    pub filename: String,
    /// Unified diff patch text (absent for binary files)
    pub patch: Option<String>,
}

/// A single commit with message and changed files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    /// Commit SHA
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Files changed by this commit
    pub files: Vec<ChangedFile>,
}

/// A workflow run associated with a head commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Run id (used to look up jobs)
    pub id: u64,
    /// Workflow name (the pipeline selects the run named "CI")
    pub name: String,
}

/// A job within a workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    /// Job status (`queued`, `in_progress`, `completed`)
    pub status: String,
    /// Job conclusion once completed (`success`, `failure`, `skipped`, ...)
    pub conclusion: Option<String>,
}

impl WorkflowJob {
    /// Whether this job finished and passed (or was skipped)
    pub fn passed(&self) -> bool {
        self.status == "completed"
            && matches!(self.conclusion.as_deref(), Some("success" | "skipped"))
    }
}

/// Result of fetching a file from a repository
#[derive(Debug, Clone)]
pub enum FileLookup {
    /// File exists; decoded content
    Found(String),
    /// File does not exist at the requested path
    NotFound,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Whether the merge was performed
    pub merged: bool,
    /// SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge endpoint (especially on failure)
    pub message: Option<String>,
}

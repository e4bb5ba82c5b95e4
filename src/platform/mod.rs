//! Hosting platform services
//!
//! Provides the narrow interface the decision engine consumes. Everything the
//! pipeline and orchestrator know about the outside world goes through this
//! trait, so the core logic can be exercised against a test double.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CommitDetails, CommitSummary, FileLookup, MergeOutcome, PullRequestSummary, RepoId,
    WorkflowJob, WorkflowRun,
};
use async_trait::async_trait;

/// Hosting service trait for the collaborators the decision engine needs
///
/// One method per remote resource; no method performs policy logic. All
/// listing methods preserve the upstream ordering (PRs by creation time,
/// commits in PR order).
#[async_trait]
pub trait HostingService: Send + Sync {
    /// List open PRs in `repo` authored by `author`, sorted by creation time
    async fn list_open_prs(&self, repo: &RepoId, author: &str) -> Result<Vec<PullRequestSummary>>;

    /// List the commits of a PR, in order (used to count them)
    async fn list_pr_commits(&self, repo: &RepoId, pr_number: u64) -> Result<Vec<CommitSummary>>;

    /// Fetch a single commit's message and changed files with patches
    async fn get_commit(&self, repo: &RepoId, sha: &str) -> Result<CommitDetails>;

    /// List workflow runs for a head commit
    async fn list_workflow_runs(&self, repo: &RepoId, head_sha: &str) -> Result<Vec<WorkflowRun>>;

    /// List the jobs of a workflow run
    async fn list_workflow_jobs(&self, repo: &RepoId, run_id: u64) -> Result<Vec<WorkflowJob>>;

    /// Fetch a file's decoded content, distinguishing "no such file"
    async fn fetch_file(&self, repo: &RepoId, path: &str) -> Result<FileLookup>;

    /// Post an approving review on a PR; returns the HTTP status code
    async fn post_approval(&self, repo: &RepoId, pr_number: u64, body: &str) -> Result<u16>;

    /// Request a merge of a PR
    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeOutcome>;
}

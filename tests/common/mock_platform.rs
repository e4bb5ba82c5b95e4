//! Mock hosting service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use dependamerge::config::{API_VERSION, CONFIG_PATH};
use dependamerge::error::{Error, Result};
use dependamerge::platform::HostingService;
use dependamerge::types::{
    ChangedFile, CommitDetails, CommitSummary, FileLookup, MergeOutcome, PullRequestSummary,
    RepoId, WorkflowJob, WorkflowRun,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `post_approval`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
    pub repo: String,
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub repo: String,
    pub pr_number: u64,
}

/// Simple mock hosting service for testing
///
/// This manually implements `HostingService` rather than using a mocking
/// crate, so responses are plain data and call order can be asserted.
///
/// Features:
/// - Configurable responses per resource
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - Unconfigured fetches return errors, so a test that expects a gate to
///   short-circuit will fail loudly if a later fetch happens anyway
#[derive(Default)]
pub struct MockHostService {
    // Response maps
    open_prs: Mutex<HashMap<String, Vec<PullRequestSummary>>>,
    pr_commits: Mutex<HashMap<(String, u64), Vec<CommitSummary>>>,
    commits: Mutex<HashMap<String, CommitDetails>>,
    workflow_runs: Mutex<HashMap<String, Vec<WorkflowRun>>>,
    workflow_jobs: Mutex<HashMap<u64, Vec<WorkflowJob>>>,
    files: Mutex<HashMap<(String, String), FileLookup>>,
    approval_statuses: Mutex<HashMap<u64, u16>>,
    merge_responses: Mutex<HashMap<(String, u64), MergeOutcome>>,
    // Call tracking
    list_open_prs_calls: Mutex<Vec<String>>,
    pr_commits_calls: Mutex<Vec<(String, u64)>>,
    get_commit_calls: Mutex<Vec<(String, String)>>,
    workflow_runs_calls: Mutex<Vec<(String, String)>>,
    workflow_jobs_calls: Mutex<Vec<u64>>,
    fetch_file_calls: Mutex<Vec<(String, String)>>,
    approval_calls: Mutex<Vec<ApprovalCall>>,
    merge_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list_prs: Mutex<Option<String>>,
    error_on_merge: Mutex<HashMap<(String, u64), String>>,
}

impl MockHostService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    // === Response configuration ===

    /// Add an open PR to a repository's listing
    pub fn add_open_pr(&self, repo: &RepoId, pr: PullRequestSummary) {
        self.open_prs
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push(pr);
    }

    /// Set the commit listing for a PR
    pub fn set_pr_commits(&self, repo: &RepoId, pr_number: u64, shas: &[&str]) {
        self.pr_commits.lock().unwrap().insert(
            (repo.to_string(), pr_number),
            shas.iter()
                .map(|sha| CommitSummary {
                    sha: (*sha).to_string(),
                })
                .collect(),
        );
    }

    /// Set the details for a commit sha
    pub fn set_commit(&self, sha: &str, message: &str, files: Vec<ChangedFile>) {
        self.commits.lock().unwrap().insert(
            sha.to_string(),
            CommitDetails {
                sha: sha.to_string(),
                message: message.to_string(),
                files,
            },
        );
    }

    /// Set the workflow runs for a head sha
    pub fn set_workflow_runs(&self, sha: &str, runs: Vec<WorkflowRun>) {
        self.workflow_runs
            .lock()
            .unwrap()
            .insert(sha.to_string(), runs);
    }

    /// Set the jobs for a workflow run
    pub fn set_workflow_jobs(&self, run_id: u64, jobs: Vec<WorkflowJob>) {
        self.workflow_jobs.lock().unwrap().insert(run_id, jobs);
    }

    /// Set the content (or absence) of a repository file
    pub fn set_file(&self, repo: &RepoId, path: &str, lookup: FileLookup) {
        self.files
            .lock()
            .unwrap()
            .insert((repo.to_string(), path.to_string()), lookup);
    }

    /// Set the HTTP status `post_approval` returns for a PR (default 200)
    pub fn set_approval_status(&self, pr_number: u64, status: u16) {
        self.approval_statuses
            .lock()
            .unwrap()
            .insert(pr_number, status);
    }

    /// Set the response for `merge_pr`
    pub fn set_merge_response(&self, repo: &RepoId, pr_number: u64, outcome: MergeOutcome) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert((repo.to_string(), pr_number), outcome);
    }

    // === Error injection ===

    /// Make `list_open_prs` return an error
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error for a specific PR
    pub fn fail_merge_pr(&self, repo: &RepoId, pr_number: u64, msg: &str) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert((repo.to_string(), pr_number), msg.to_string());
    }

    // === Scenario helpers ===

    /// Wire up a PR that passes every gate: one commit touching only the
    /// lock file, a green CI run, a policy document allowlisting `dep` for
    /// `bumps`, and a successful merge response.
    ///
    /// The head sha and CI run id are derived from the PR number.
    pub fn setup_passing_pr(
        &self,
        repo: &RepoId,
        pr_number: u64,
        dep: &str,
        from: &str,
        to: &str,
        bumps: &[&str],
    ) {
        let sha = head_sha(pr_number);
        let run_id = pr_number * 100;

        self.add_open_pr(repo, make_pr(pr_number, repo));
        self.set_pr_commits(repo, pr_number, &[&sha]);
        self.set_commit(
            &sha,
            &format!("Bump {dep} from {from} to {to}"),
            vec![lockfile_change(dep, from, to)],
        );
        self.set_workflow_runs(
            &sha,
            vec![WorkflowRun {
                id: run_id,
                name: "CI".to_string(),
            }],
        );
        self.set_workflow_jobs(
            run_id,
            vec![
                WorkflowJob {
                    status: "completed".to_string(),
                    conclusion: Some("success".to_string()),
                },
                WorkflowJob {
                    status: "completed".to_string(),
                    conclusion: Some("skipped".to_string()),
                },
            ],
        );
        // Allowlist this dep, accumulating onto any config already set for the
        // repo so that multiple passing PRs on one repo compose rather than
        // clobbering each other's allowlist entry.
        let config = match self
            .files
            .lock()
            .unwrap()
            .get(&(repo.to_string(), CONFIG_PATH.to_string()))
        {
            Some(FileLookup::Found(existing)) => format!("{existing}{}", dep_entry(dep, bumps)),
            _ => policy_config(dep, bumps),
        };
        self.set_file(repo, CONFIG_PATH, FileLookup::Found(config));
        self.set_merge_response(
            repo,
            pr_number,
            MergeOutcome {
                merged: true,
                sha: Some(format!("merged_{pr_number}")),
                message: None,
            },
        );
    }

    // === Call verification ===

    /// Repos `list_open_prs` was called for
    pub fn get_list_open_prs_calls(&self) -> Vec<String> {
        self.list_open_prs_calls.lock().unwrap().clone()
    }

    /// PRs whose commit listing was fetched
    pub fn get_pr_commits_calls(&self) -> Vec<(String, u64)> {
        self.pr_commits_calls.lock().unwrap().clone()
    }

    /// Commits fetched via `get_commit`
    pub fn get_commit_calls(&self) -> Vec<(String, String)> {
        self.get_commit_calls.lock().unwrap().clone()
    }

    /// Head shas whose workflow runs were listed
    pub fn get_workflow_runs_calls(&self) -> Vec<(String, String)> {
        self.workflow_runs_calls.lock().unwrap().clone()
    }

    /// Run ids whose jobs were listed
    pub fn get_workflow_jobs_calls(&self) -> Vec<u64> {
        self.workflow_jobs_calls.lock().unwrap().clone()
    }

    /// Files fetched
    pub fn get_fetch_file_calls(&self) -> Vec<(String, String)> {
        self.fetch_file_calls.lock().unwrap().clone()
    }

    /// Approval reviews posted
    pub fn get_approval_calls(&self) -> Vec<ApprovalCall> {
        self.approval_calls.lock().unwrap().clone()
    }

    /// Merges requested
    pub fn get_merge_calls(&self) -> Vec<MergePrCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Count of merge requests across all PRs
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, repo: &RepoId, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.repo == repo.to_string() && c.pr_number == pr_number),
            "Expected merge_pr({repo}, {pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, repo: &RepoId, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            !calls
                .iter()
                .any(|c| c.repo == repo.to_string() && c.pr_number == pr_number),
            "Expected merge_pr({repo}, {pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that an approval was posted for a specific PR
    pub fn assert_approval_posted(&self, pr_number: u64) {
        let calls = self.get_approval_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected post_approval({pr_number}) but got: {calls:?}"
        );
    }
}

#[async_trait]
impl HostingService for MockHostService {
    async fn list_open_prs(&self, repo: &RepoId, _author: &str) -> Result<Vec<PullRequestSummary>> {
        self.list_open_prs_calls
            .lock()
            .unwrap()
            .push(repo.to_string());

        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.open_prs.lock().unwrap();
        Ok(responses.get(&repo.to_string()).cloned().unwrap_or_default())
    }

    async fn list_pr_commits(&self, repo: &RepoId, pr_number: u64) -> Result<Vec<CommitSummary>> {
        self.pr_commits_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), pr_number));

        let responses = self.pr_commits.lock().unwrap();
        responses
            .get(&(repo.to_string(), pr_number))
            .cloned()
            .ok_or_else(|| {
                Error::Platform(format!(
                    "list_pr_commits: no response configured for {repo}#{pr_number}"
                ))
            })
    }

    async fn get_commit(&self, repo: &RepoId, sha: &str) -> Result<CommitDetails> {
        self.get_commit_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), sha.to_string()));

        let responses = self.commits.lock().unwrap();
        responses.get(sha).cloned().ok_or_else(|| {
            Error::Platform(format!("get_commit: no response configured for {sha}"))
        })
    }

    async fn list_workflow_runs(&self, repo: &RepoId, head_sha: &str) -> Result<Vec<WorkflowRun>> {
        self.workflow_runs_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), head_sha.to_string()));

        let responses = self.workflow_runs.lock().unwrap();
        responses.get(head_sha).cloned().ok_or_else(|| {
            Error::Platform(format!(
                "list_workflow_runs: no response configured for {head_sha}"
            ))
        })
    }

    async fn list_workflow_jobs(&self, _repo: &RepoId, run_id: u64) -> Result<Vec<WorkflowJob>> {
        self.workflow_jobs_calls.lock().unwrap().push(run_id);

        let responses = self.workflow_jobs.lock().unwrap();
        responses.get(&run_id).cloned().ok_or_else(|| {
            Error::Platform(format!(
                "list_workflow_jobs: no response configured for run {run_id}"
            ))
        })
    }

    async fn fetch_file(&self, repo: &RepoId, path: &str) -> Result<FileLookup> {
        self.fetch_file_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), path.to_string()));

        let responses = self.files.lock().unwrap();
        responses
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::Platform(format!(
                    "fetch_file: no response configured for {repo}:{path}"
                ))
            })
    }

    async fn post_approval(&self, repo: &RepoId, pr_number: u64, body: &str) -> Result<u16> {
        self.approval_calls.lock().unwrap().push(ApprovalCall {
            repo: repo.to_string(),
            pr_number,
            body: body.to_string(),
        });

        let statuses = self.approval_statuses.lock().unwrap();
        Ok(statuses.get(&pr_number).copied().unwrap_or(200))
    }

    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(MergePrCall {
            repo: repo.to_string(),
            pr_number,
        });

        if let Some(msg) = self
            .error_on_merge
            .lock()
            .unwrap()
            .get(&(repo.to_string(), pr_number))
        {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.merge_responses.lock().unwrap();
        responses
            .get(&(repo.to_string(), pr_number))
            .cloned()
            .ok_or_else(|| {
                Error::Platform(format!(
                    "merge_pr: no response configured for {repo}#{pr_number}"
                ))
            })
    }
}

// === Fixture helpers ===

/// Deterministic head sha for a PR number
pub fn head_sha(pr_number: u64) -> String {
    format!("sha_{pr_number}")
}

/// A bot PR summary whose head and base repos are `repo`
pub fn make_pr(number: u64, repo: &RepoId) -> PullRequestSummary {
    PullRequestSummary {
        number,
        head_sha: head_sha(number),
        head_repo: repo.to_string(),
        base_repo: repo.to_string(),
    }
}

/// A lock-file change entry whose patch removes `from` and adds `to`
pub fn lockfile_change(dep: &str, from: &str, to: &str) -> ChangedFile {
    ChangedFile {
        filename: "Gemfile.lock".to_string(),
        patch: Some(format!("-    {dep} ({from})\n+    {dep} ({to})")),
    }
}

/// A policy document allowlisting `dep` for `bumps`, with a matching version
pub fn policy_config(dep: &str, bumps: &[&str]) -> String {
    format!(
        "api_version: {API_VERSION}\n\
         auto_merge:\n\
         {}",
        dep_entry(dep, bumps)
    )
}

/// A single `auto_merge` allowlist entry (indented list item)
fn dep_entry(dep: &str, bumps: &[&str]) -> String {
    format!(
        "\x20 - dependency: {dep}\n\
         \x20   allowed_semver_bumps: [{}]\n",
        bumps.join(", ")
    )
}

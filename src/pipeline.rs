//! Pull request validation pipeline
//!
//! Runs the ordered gate checks against one pull request and produces a
//! verdict plus rejection reasons. Evaluation is short-circuit: the first
//! failing gate appends its reason and stops the pipeline. Remote fetches are
//! memoized per evaluation, so each distinct resource costs at most one round
//! trip no matter how many gates consult it.

use crate::config::{self, ConfigLookup, CONFIG_PATH};
use crate::error::{Error, Result};
use crate::extract::{self, LOCKFILE_PATH};
use crate::platform::HostingService;
use crate::policy::DependencyPolicy;
use crate::types::{
    CommitDetails, FileLookup, PullRequestSummary, RepoId, WorkflowJob, WorkflowRun,
};
use tracing::debug;

/// Review body posted when a PR passes every gate
pub const APPROVAL_BODY: &str = "Approved automatically by dependamerge: this update passes the repository's auto-merge policy.";

/// Name of the workflow run the CI gates look for
const CI_WORKFLOW_NAME: &str = "CI";

/// Rejection reason strings, one per gate, pre-bound in gate order
pub mod reasons {
    /// Gate 1: the PR must contain exactly one commit
    pub const MULTIPLE_COMMITS: &str = "PR does not contain exactly one commit";
    /// Gate 2: the commit must touch only the lock file
    pub const NOT_ONLY_LOCKFILE: &str = "PR changes files other than the lock file";
    /// Gate 3: a CI workflow run must exist for the head commit
    pub const NO_CI_RUN: &str = "no CI workflow run found for the head commit";
    /// Gate 4: every CI job must have completed successfully (or been skipped)
    pub const CI_NOT_GREEN: &str = "CI workflow has not completed successfully";
    /// Gate 5: the repository must carry an auto-merge policy document
    pub const CONFIG_MISSING: &str = "auto-merge config not found in the target repository";
    /// Gate 6: the policy document must parse
    pub const CONFIG_MALFORMED: &str = "auto-merge config is malformed";
    /// Gate 6: the policy document must match this tool's version
    pub const CONFIG_VERSION_MISMATCH: &str =
        "auto-merge config api_version does not match this tool";
    /// Gate 8: every proposed change must be allowlisted
    pub const NOT_ON_ALLOWLIST: &str = "a proposed dependency is not on the auto-merge allowlist";
    /// Gate 9: every proposed bump must be within its permitted magnitude
    pub const BUMP_TOO_LARGE: &str = "a proposed version bump exceeds its allowed magnitude";
    /// Gate 9: versions that cannot be classified reject rather than crash
    pub const UNPARSEABLE_VERSION: &str = "a proposed version could not be parsed";
}

/// The pipeline's public result: approved iff the reasons list is empty
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Whether every gate passed
    pub approved: bool,
    /// Why the PR was rejected, in gate order (empty when approved)
    pub reasons: Vec<String>,
}

/// One pull request evaluation
///
/// Owns its policy state, its reason list, and its fetch memos; nothing here
/// is shared across PRs. `repo` is the repository the PR was listed from;
/// the policy document is fetched from the PR's base repository.
pub struct PrEvaluation<'a> {
    platform: &'a dyn HostingService,
    repo: RepoId,
    pr: PullRequestSummary,
    reasons: Vec<String>,
    // Memoized fetches, scoped to this evaluation
    commit_count: Option<usize>,
    head_commit: Option<CommitDetails>,
    workflow_runs: Option<Vec<WorkflowRun>>,
    config_file: Option<FileLookup>,
}

impl<'a> PrEvaluation<'a> {
    /// Create an evaluation for one PR
    pub fn new(platform: &'a dyn HostingService, repo: RepoId, pr: PullRequestSummary) -> Self {
        Self {
            platform,
            repo,
            pr,
            reasons: Vec::new(),
            commit_count: None,
            head_commit: None,
            workflow_runs: None,
            config_file: None,
        }
    }

    /// The PR under evaluation
    pub fn pr(&self) -> &PullRequestSummary {
        &self.pr
    }

    // === Memoized fetch helpers ===

    async fn commit_count(&mut self) -> Result<usize> {
        if self.commit_count.is_none() {
            let commits = self
                .platform
                .list_pr_commits(&self.repo, self.pr.number)
                .await?;
            self.commit_count = Some(commits.len());
        }
        self.commit_count
            .ok_or_else(|| Error::Internal("commit count not cached".to_string()))
    }

    async fn head_commit(&mut self) -> Result<&CommitDetails> {
        if self.head_commit.is_none() {
            let commit = self
                .platform
                .get_commit(&self.repo, &self.pr.head_sha)
                .await?;
            self.head_commit = Some(commit);
        }
        match &self.head_commit {
            Some(commit) => Ok(commit),
            None => Err(Error::Internal("head commit not cached".to_string())),
        }
    }

    async fn workflow_runs(&mut self) -> Result<&[WorkflowRun]> {
        if self.workflow_runs.is_none() {
            let runs = self
                .platform
                .list_workflow_runs(&self.repo, &self.pr.head_sha)
                .await?;
            self.workflow_runs = Some(runs);
        }
        match &self.workflow_runs {
            Some(runs) => Ok(runs),
            None => Err(Error::Internal("workflow runs not cached".to_string())),
        }
    }

    async fn config_file(&mut self) -> Result<&FileLookup> {
        if self.config_file.is_none() {
            let base_repo = RepoId::parse(&self.pr.base_repo).ok_or_else(|| {
                Error::UnexpectedResponse(format!(
                    "PR #{} base repo {:?} is not an owner/name slug",
                    self.pr.number, self.pr.base_repo
                ))
            })?;
            let lookup = self.platform.fetch_file(&base_repo, CONFIG_PATH).await?;
            self.config_file = Some(lookup);
        }
        match &self.config_file {
            Some(lookup) => Ok(lookup),
            None => Err(Error::Internal("config lookup not cached".to_string())),
        }
    }

    // === Evaluation ===

    fn reject(&mut self, reason: impl Into<String>) -> Verdict {
        let reason = reason.into();
        debug!(pr = self.pr.number, %reason, "gate failed");
        self.reasons.push(reason);
        Verdict {
            approved: false,
            reasons: self.reasons.clone(),
        }
    }

    /// Run the gates in order, stopping at the first failure.
    ///
    /// Gate failures become rejection reasons; genuinely exceptional
    /// conditions (transport failures, malformed upstream responses)
    /// propagate as errors instead.
    pub async fn evaluate(&mut self) -> Result<Verdict> {
        // Gate 1: exactly one commit
        if self.commit_count().await? != 1 {
            return Ok(self.reject(reasons::MULTIPLE_COMMITS));
        }

        // Gate 2: the change set is exactly the lock file
        let files: Vec<String> = self
            .head_commit()
            .await?
            .files
            .iter()
            .map(|f| f.filename.clone())
            .collect();
        if files.len() != 1 || files[0] != LOCKFILE_PATH {
            return Ok(self.reject(reasons::NOT_ONLY_LOCKFILE));
        }

        // Gate 3: a workflow run named "CI" exists for the head commit
        let ci_run_id = self
            .workflow_runs()
            .await?
            .iter()
            .find(|run| run.name == CI_WORKFLOW_NAME)
            .map(|run| run.id);
        let Some(ci_run_id) = ci_run_id else {
            return Ok(self.reject(reasons::NO_CI_RUN));
        };

        // Gate 4: all of that run's jobs completed green or skipped
        let jobs = self.platform.list_workflow_jobs(&self.repo, ci_run_id).await?;
        if !jobs.iter().all(WorkflowJob::passed) {
            return Ok(self.reject(reasons::CI_NOT_GREEN));
        }

        // Gates 5 + 6: policy document exists, parses, and matches our version
        let merge_config = match config::from_file_lookup(self.config_file().await?) {
            ConfigLookup::NotFound => return Ok(self.reject(reasons::CONFIG_MISSING)),
            ConfigLookup::Malformed(detail) => {
                debug!(pr = self.pr.number, %detail, "config parse failed");
                return Ok(self.reject(reasons::CONFIG_MALFORMED));
            }
            ConfigLookup::Found(config) => config,
        };
        if !merge_config.api_version_matches() {
            return Ok(self.reject(reasons::CONFIG_VERSION_MISMATCH));
        }

        // Gate 7: populate the policy from config + extracted changes
        let head_sha = self.pr.head_sha.clone();
        let commit = self.head_commit().await?;
        let lockfile_patch = commit
            .files
            .iter()
            .find(|f| f.filename == LOCKFILE_PATH)
            .and_then(|f| f.patch.clone())
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!(
                    "commit {head_sha} has no patch for {LOCKFILE_PATH}"
                ))
            })?;
        let message = commit.message.clone();

        let mut policy = DependencyPolicy::new();
        for entry in &merge_config.auto_merge {
            policy.allow(&entry.dependency, entry.allowed_semver_bumps.clone());
        }
        for change in extract::extract(&message, &lockfile_patch) {
            policy.propose(&change.name, &change.previous, &change.next);
        }

        // Gate 8: every proposed change is allowlisted
        if !policy.all_on_allowlist() {
            return Ok(self.reject(reasons::NOT_ON_ALLOWLIST));
        }

        // Gate 9: every proposed bump is within its permitted magnitude
        match policy.all_within_allowed_magnitude() {
            Ok(true) => {}
            Ok(false) => return Ok(self.reject(reasons::BUMP_TOO_LARGE)),
            Err(Error::VersionFormat(version)) => {
                return Ok(self.reject(format!("{}: {version:?}", reasons::UNPARSEABLE_VERSION)));
            }
            Err(e) => return Err(e),
        }

        debug!(pr = self.pr.number, "all gates passed");
        Ok(Verdict {
            approved: true,
            reasons: Vec::new(),
        })
    }

    /// Post the approval review for a PR that passed every gate.
    ///
    /// A non-2xx response is a tool malfunction, not a policy rejection, and
    /// surfaces as [`Error::ApprovalFailed`].
    pub async fn post_approval(&self) -> Result<()> {
        let status = self
            .platform
            .post_approval(&self.repo, self.pr.number, APPROVAL_BODY)
            .await?;

        if !(200..300).contains(&status) {
            return Err(Error::ApprovalFailed {
                number: self.pr.number,
                status,
            });
        }

        debug!(pr = self.pr.number, "approval posted");
        Ok(())
    }
}

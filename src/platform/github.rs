//! GitHub hosting service implementation

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::types::{
    ChangedFile, CommitDetails, CommitSummary, FileLookup, MergeOutcome, PullRequestSummary,
    RepoId, WorkflowJob, WorkflowRun,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

// Response types for the raw REST requests. Only the fields the decision
// engine consumes are modeled; everything else in the payload is ignored.

#[derive(Deserialize)]
struct RestCommit {
    sha: String,
    commit: RestCommitInner,
    files: Option<Vec<RestFile>>,
}

#[derive(Deserialize)]
struct RestCommitInner {
    message: String,
}

#[derive(Deserialize)]
struct RestFile {
    filename: String,
    patch: Option<String>,
}

#[derive(Deserialize)]
struct RestPrCommit {
    sha: String,
}

#[derive(Deserialize)]
struct RestWorkflowRuns {
    workflow_runs: Vec<RestWorkflowRun>,
}

#[derive(Deserialize)]
struct RestWorkflowRun {
    id: u64,
    name: Option<String>,
}

#[derive(Deserialize)]
struct RestWorkflowJobs {
    jobs: Vec<RestWorkflowJob>,
}

#[derive(Deserialize)]
struct RestWorkflowJob {
    status: String,
    conclusion: Option<String>,
}

/// GitHub service using octocrab for PR endpoints and a raw client for the
/// Actions and contents endpoints
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API host for raw requests
    api_host: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` targets github.com.
    pub fn new(token: &str, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("dependamerge")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_host,
        })
    }

    fn repo_url(&self, repo: &RepoId, rest: &str) -> String {
        format!(
            "https://{}/repos/{}/{}/{rest}",
            self.api_host, repo.owner, repo.name
        )
    }

    async fn get_raw(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        self.http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("request to {url} failed: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get_raw(url, "application/vnd.github+json").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!("GET {url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::UnexpectedResponse(format!("GET {url}: {e}")))
    }
}

#[async_trait]
impl HostingService for GitHubService {
    async fn list_open_prs(&self, repo: &RepoId, author: &str) -> Result<Vec<PullRequestSummary>> {
        debug!(%repo, author, "listing open PRs");

        let page = self
            .client
            .pulls(&repo.owner, &repo.name)
            .list()
            .state(octocrab::params::State::Open)
            .sort(octocrab::params::pulls::Sort::Created)
            .direction(octocrab::params::Direction::Ascending)
            .per_page(100)
            .send()
            .await?;

        let mut result = Vec::new();
        for pr in page.items {
            let by_author = pr
                .user
                .as_ref()
                .is_some_and(|user| user.login == author);
            if !by_author {
                continue;
            }

            let head_repo = pr
                .head
                .repo
                .as_ref()
                .and_then(|r| r.full_name.clone())
                .ok_or_else(|| {
                    Error::UnexpectedResponse(format!(
                        "PR #{} listing missing head repo name",
                        pr.number
                    ))
                })?;
            let base_repo = pr
                .base
                .repo
                .as_ref()
                .and_then(|r| r.full_name.clone())
                .ok_or_else(|| {
                    Error::UnexpectedResponse(format!(
                        "PR #{} listing missing base repo name",
                        pr.number
                    ))
                })?;

            result.push(PullRequestSummary {
                number: pr.number,
                head_sha: pr.head.sha.clone(),
                head_repo,
                base_repo,
            });
        }

        debug!(%repo, count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn list_pr_commits(&self, repo: &RepoId, pr_number: u64) -> Result<Vec<CommitSummary>> {
        debug!(%repo, pr_number, "listing PR commits");

        let url = self.repo_url(repo, &format!("pulls/{pr_number}/commits"));
        let commits: Vec<RestPrCommit> = self.get_json(&url).await?;

        Ok(commits
            .into_iter()
            .map(|c| CommitSummary { sha: c.sha })
            .collect())
    }

    async fn get_commit(&self, repo: &RepoId, sha: &str) -> Result<CommitDetails> {
        debug!(%repo, sha, "fetching commit");

        let url = self.repo_url(repo, &format!("commits/{sha}"));
        let commit: RestCommit = self.get_json(&url).await?;

        let files = commit
            .files
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!("commit {sha} response missing files"))
            })?
            .into_iter()
            .map(|f| ChangedFile {
                filename: f.filename,
                patch: f.patch,
            })
            .collect();

        Ok(CommitDetails {
            sha: commit.sha,
            message: commit.commit.message,
            files,
        })
    }

    async fn list_workflow_runs(&self, repo: &RepoId, head_sha: &str) -> Result<Vec<WorkflowRun>> {
        debug!(%repo, head_sha, "listing workflow runs");

        let url = self.repo_url(repo, &format!("actions/runs?head_sha={head_sha}"));
        let runs: RestWorkflowRuns = self.get_json(&url).await?;

        runs.workflow_runs
            .into_iter()
            .map(|run| match run.name {
                Some(name) => Ok(WorkflowRun { id: run.id, name }),
                None => Err(Error::UnexpectedResponse(format!(
                    "workflow run {} missing name",
                    run.id
                ))),
            })
            .collect()
    }

    async fn list_workflow_jobs(&self, repo: &RepoId, run_id: u64) -> Result<Vec<WorkflowJob>> {
        debug!(%repo, run_id, "listing workflow jobs");

        let url = self.repo_url(repo, &format!("actions/runs/{run_id}/jobs"));
        let jobs: RestWorkflowJobs = self.get_json(&url).await?;

        Ok(jobs
            .jobs
            .into_iter()
            .map(|j| WorkflowJob {
                status: j.status,
                conclusion: j.conclusion,
            })
            .collect())
    }

    async fn fetch_file(&self, repo: &RepoId, path: &str) -> Result<FileLookup> {
        debug!(%repo, path, "fetching file");

        let url = self.repo_url(repo, &format!("contents/{path}"));
        let response = self.get_raw(&url, "application/vnd.github.raw+json").await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(FileLookup::NotFound),
            status if status.is_success() => {
                let content = response.text().await.map_err(|e| {
                    Error::UnexpectedResponse(format!("GET {url}: failed to read body: {e}"))
                })?;
                Ok(FileLookup::Found(content))
            }
            status => Err(Error::GitHubApi(format!("GET {url} returned {status}"))),
        }
    }

    async fn post_approval(&self, repo: &RepoId, pr_number: u64, body: &str) -> Result<u16> {
        debug!(%repo, pr_number, "posting approval review");

        let url = self.repo_url(repo, &format!("pulls/{pr_number}/reviews"));
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&serde_json::json!({ "event": "APPROVE", "body": body }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("request to {url} failed: {e}")))?;

        Ok(response.status().as_u16())
    }

    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeOutcome> {
        debug!(%repo, pr_number, "merging PR");

        let result = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Merge)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let outcome = MergeOutcome {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            %repo,
            pr_number,
            merged = outcome.merged,
            sha = ?outcome.sha,
            "merge complete"
        );
        Ok(outcome)
    }
}

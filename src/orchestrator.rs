//! Run orchestration across configured repositories
//!
//! Walks every configured repository, evaluates each open bot-authored PR
//! with the validation pipeline, and approves + merges the ones that pass.
//! A failed merge is logged and the loop continues; everything else that
//! goes wrong (listing failures, approval failures, malformed upstream
//! responses) aborts the run.

use crate::calendar::HolidayCalendar;
use crate::error::Result;
use crate::pipeline::PrEvaluation;
use crate::platform::HostingService;
use crate::types::RepoId;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Options for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Evaluate and report without approving or merging
    pub dry_run: bool,
}

/// What happened to one evaluated PR
#[derive(Debug, Clone)]
pub enum PrOutcome {
    /// Approved and merged
    Merged {
        /// SHA of the merge commit, when the API reported one
        sha: Option<String>,
    },
    /// Would have been approved and merged (dry run)
    WouldMerge,
    /// One or more gates failed
    Rejected {
        /// Rejection reasons, in gate order
        reasons: Vec<String>,
    },
    /// Approved, but the merge request failed (run continues)
    MergeFailed {
        /// Error or message from the merge endpoint
        detail: String,
    },
}

/// Report entry for one PR
#[derive(Debug, Clone)]
pub struct PrReport {
    /// Repository the PR belongs to
    pub repo: RepoId,
    /// PR number
    pub number: u64,
    /// Outcome of the evaluation
    pub outcome: PrOutcome,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// True when the calendar guard skipped the run entirely
    pub skipped_non_working_day: bool,
    /// Repositories scanned
    pub repos_scanned: usize,
    /// Per-PR outcomes, in listing order
    pub prs: Vec<PrReport>,
}

impl RunReport {
    /// Count of PRs merged (or that would merge, in a dry run)
    pub fn merge_count(&self) -> usize {
        self.prs
            .iter()
            .filter(|p| matches!(p.outcome, PrOutcome::Merged { .. } | PrOutcome::WouldMerge))
            .count()
    }
}

/// Orchestrates one run over the configured repositories
pub struct MergeOrchestrator<'a> {
    platform: &'a dyn HostingService,
    calendar: &'a dyn HolidayCalendar,
    repos: Vec<RepoId>,
    bot_login: String,
    options: RunOptions,
}

impl<'a> MergeOrchestrator<'a> {
    /// Create an orchestrator
    pub fn new(
        platform: &'a dyn HostingService,
        calendar: &'a dyn HolidayCalendar,
        repos: Vec<RepoId>,
        bot_login: impl Into<String>,
        options: RunOptions,
    ) -> Self {
        Self {
            platform,
            calendar,
            repos,
            bot_login: bot_login.into(),
            options,
        }
    }

    /// Perform one run as of `today`.
    ///
    /// PRs are processed one at a time, fully, in listing order; no state is
    /// shared between evaluations.
    pub async fn run(&self, today: NaiveDate) -> Result<RunReport> {
        let mut report = RunReport::default();

        if self.calendar.is_non_working_day(today) {
            info!(%today, "non-working day, skipping run");
            report.skipped_non_working_day = true;
            return Ok(report);
        }

        for repo in &self.repos {
            debug!(%repo, "scanning repository");
            let prs = self.platform.list_open_prs(repo, &self.bot_login).await?;
            report.repos_scanned += 1;

            for pr in prs {
                let number = pr.number;
                let mut evaluation = PrEvaluation::new(self.platform, repo.clone(), pr);
                let verdict = evaluation.evaluate().await?;

                if !verdict.approved {
                    info!(%repo, pr = number, reasons = ?verdict.reasons, "PR rejected");
                    report.prs.push(PrReport {
                        repo: repo.clone(),
                        number,
                        outcome: PrOutcome::Rejected {
                            reasons: verdict.reasons,
                        },
                    });
                    continue;
                }

                if self.options.dry_run {
                    info!(%repo, pr = number, "PR would merge (dry run)");
                    report.prs.push(PrReport {
                        repo: repo.clone(),
                        number,
                        outcome: PrOutcome::WouldMerge,
                    });
                    continue;
                }

                // Approval failure is a tool malfunction and aborts the run
                evaluation.post_approval().await?;

                // Merge failure is isolated: log it, keep going
                let outcome = match self.platform.merge_pr(repo, number).await {
                    Ok(merge) if merge.merged => {
                        info!(%repo, pr = number, sha = ?merge.sha, "PR merged");
                        PrOutcome::Merged { sha: merge.sha }
                    }
                    Ok(merge) => {
                        let detail = merge
                            .message
                            .unwrap_or_else(|| "merge endpoint returned merged=false".to_string());
                        warn!(%repo, pr = number, %detail, "merge failed");
                        PrOutcome::MergeFailed { detail }
                    }
                    Err(e) => {
                        warn!(%repo, pr = number, error = %e, "merge failed");
                        PrOutcome::MergeFailed {
                            detail: e.to_string(),
                        }
                    }
                };
                report.prs.push(PrReport {
                    repo: repo.clone(),
                    number,
                    outcome,
                });
            }
        }

        Ok(report)
    }
}

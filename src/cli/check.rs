//! Check command - evaluate a single PR and print the verdict

use crate::cli::style::{check, Stylize};
use anstream::println;
use dependamerge::auth::get_github_auth;
use dependamerge::error::{Error, Result};
use dependamerge::pipeline::PrEvaluation;
use dependamerge::platform::{GitHubService, HostingService};
use dependamerge::settings;
use dependamerge::types::RepoId;
use std::path::PathBuf;

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckCliOptions {
    /// Repository slug (`owner/name`)
    pub repo: String,
    /// PR number to evaluate
    pub number: u64,
    /// Settings file override
    pub config: Option<PathBuf>,
}

/// Run the check command. Never approves or merges.
pub async fn run_check(options: CheckCliOptions) -> Result<()> {
    let repo = RepoId::parse(&options.repo).ok_or_else(|| {
        Error::Settings(format!(
            "invalid repository {:?} (expected owner/name)",
            options.repo
        ))
    })?;

    let settings_path = match options.config {
        Some(path) => path,
        None => settings::default_path()?,
    };
    let settings = settings::load(&settings_path)?;

    let auth = get_github_auth()?;
    let platform = GitHubService::new(&auth.token, None)?;

    let prs = platform.list_open_prs(&repo, &settings.bot_login).await?;
    let Some(pr) = prs.into_iter().find(|pr| pr.number == options.number) else {
        println!(
            "{}",
            format!(
                "PR #{} is not an open {} PR in {repo}.",
                options.number, settings.bot_login
            )
            .warn()
        );
        return Ok(());
    };

    let mut evaluation = PrEvaluation::new(&platform, repo.clone(), pr);
    let verdict = evaluation.evaluate().await?;

    if verdict.approved {
        println!(
            "{} {} {}",
            check(),
            format!("{repo} #{}", options.number).accent(),
            "passes every gate and would be merged.".success()
        );
    } else {
        println!(
            "{} {}",
            "✗ Not mergeable:".warn(),
            format!("{repo} #{}", options.number).accent()
        );
        for reason in &verdict.reasons {
            println!("  - {}", reason.muted());
        }
    }

    Ok(())
}

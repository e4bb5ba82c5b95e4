//! Run command - evaluate and merge bot PRs across configured repositories

use crate::cli::style::{check, spinner_style, Stylize};
use anstream::println;
use chrono::Local;
use dependamerge::auth::get_github_auth;
use dependamerge::calendar::ConfiguredCalendar;
use dependamerge::error::{Error, Result};
use dependamerge::orchestrator::{MergeOrchestrator, PrOutcome, RunOptions, RunReport};
use dependamerge::platform::{GitHubService, HostingService};
use dependamerge::settings::{self, Settings};
use dialoguer::Confirm;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunCliOptions {
    /// Evaluate and report without approving or merging
    pub dry_run: bool,
    /// Preview with a dry run and prompt for confirmation before merging
    pub confirm: bool,
    /// Settings file override
    pub config: Option<PathBuf>,
}

/// Run the run command
pub async fn run_run(options: RunCliOptions) -> Result<()> {
    let settings = load_settings(options.config.as_ref())?;
    let auth = get_github_auth()?;
    let platform = GitHubService::new(&auth.token, None)?;
    let calendar = ConfiguredCalendar::new(settings.holidays.clone(), settings.skip_weekends);
    let today = Local::now().date_naive();

    // --confirm previews with a dry run, then asks before doing it for real
    if options.confirm && !options.dry_run {
        let preview = execute(&platform, &calendar, &settings, RunOptions { dry_run: true }, today)
            .await?;
        report_run(&preview, true);

        if preview.skipped_non_working_day || preview.merge_count() == 0 {
            return Ok(());
        }

        if !Confirm::new()
            .with_prompt(format!("Merge {} PR(s)?", preview.merge_count()))
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let report = execute(
        &platform,
        &calendar,
        &settings,
        RunOptions {
            dry_run: options.dry_run,
        },
        today,
    )
    .await?;
    report_run(&report, options.dry_run);

    Ok(())
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings> {
    let path = match config {
        Some(path) => path.clone(),
        None => settings::default_path()?,
    };
    settings::load(&path)
}

async fn execute(
    platform: &dyn HostingService,
    calendar: &ConfiguredCalendar,
    settings: &Settings,
    options: RunOptions,
    today: chrono::NaiveDate,
) -> Result<RunReport> {
    let orchestrator = MergeOrchestrator::new(
        platform,
        calendar,
        settings.repo_ids(),
        settings.bot_login.clone(),
        options,
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Scanning {} repositories...",
        settings.repositories.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let report = orchestrator.run(today).await;

    spinner.finish_and_clear();
    report
}

/// Print a run report
fn report_run(report: &RunReport, dry_run: bool) {
    if report.skipped_non_working_day {
        println!(
            "{}",
            "Non-working day - no merges attempted.".muted()
        );
        return;
    }

    if report.prs.is_empty() {
        println!(
            "{} {}",
            check(),
            format!(
                "No open bot PRs across {} repositories.",
                report.repos_scanned
            )
            .muted()
        );
        return;
    }

    for pr in &report.prs {
        let label = format!("{} #{}", pr.repo, pr.number);
        match &pr.outcome {
            PrOutcome::Merged { sha } => {
                let sha_display = sha.as_deref().unwrap_or("(no sha)");
                println!(
                    "  {} {}: merged {}",
                    check(),
                    label.accent(),
                    sha_display.muted()
                );
            }
            PrOutcome::WouldMerge => {
                println!("  {} {}", "✓ Would merge".success(), label.accent());
            }
            PrOutcome::Rejected { reasons } => {
                println!("  {} {}", "✗ Not mergeable".warn(), label.accent());
                for reason in reasons {
                    println!("    - {}", reason.muted());
                }
            }
            PrOutcome::MergeFailed { detail } => {
                println!("  {} {}", "⚠ Merge failed".warn(), label.accent());
                println!("    {}", detail.muted());
            }
        }
    }

    println!();
    let verb = if dry_run { "would merge" } else { "merged" };
    println!(
        "{} {}",
        "Done:".emphasis(),
        format!(
            "{} of {} PR(s) {verb}.",
            report.merge_count(),
            report.prs.len()
        )
        .accent()
    );
}

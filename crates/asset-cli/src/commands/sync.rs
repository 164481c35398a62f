//! Sync command implementation

use std::time::Duration;

use colored::Colorize;

use asset_core::sync::{MANIFEST_FILENAME, format_remaining};
use asset_core::{
    ChangeKind, DocSyncer, SyncManifest, SyncOptions, SyncOutcome, SyncReport, SystemClock,
};
use asset_remote::HttpFetcher;

use crate::cli::SyncArgs;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// A skipped run (cooldown active) is a success.
pub fn run_sync(args: &SyncArgs) -> Result<()> {
    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| args.working_dir.join(MANIFEST_FILENAME));
    if !manifest_path.is_file() {
        return Err(CliError::user(format!(
            "No sync manifest at {}",
            manifest_path.display()
        )));
    }
    let manifest = SyncManifest::load(&manifest_path)?;

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let syncer = DocSyncer::new(&args.working_dir, manifest, fetcher, SystemClock);

    if !args.json {
        println!(
            "{} Synchronizing reference docs into {}{}",
            "=>".blue().bold(),
            syncer.references_dir().display().to_string().cyan(),
            if args.dry_run { " (dry run)".dimmed().to_string() } else { String::new() }
        );
    }

    let report = syncer.run(SyncOptions {
        force: args.force,
        dry_run: args.dry_run,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    match report.outcome {
        SyncOutcome::Failed => Err(CliError::SyncFailed {
            failures: report.failures().count(),
            index: report
                .index_error
                .as_ref()
                .map(|e| format!("; index: {e}"))
                .unwrap_or_default(),
        }),
        _ => Ok(()),
    }
}

fn print_report(report: &SyncReport) {
    if let SyncOutcome::Skipped {
        remaining,
        last_success,
    } = &report.outcome
    {
        println!(
            "{} Cooldown active: next sync in {} (last success {}).",
            "OK".green().bold(),
            format_remaining(*remaining),
            last_success.format("%Y-%m-%d %H:%M UTC")
        );
        println!("Run with {} to sync anyway.", "--force".cyan());
        return;
    }

    let would = |done: &str, planned: &str| {
        if report.dry_run { planned.to_string() } else { done.to_string() }
    };

    for change in &report.changes {
        let path = change.path.display().to_string();
        match &change.kind {
            ChangeKind::Added => {
                println!("   {} {} {}", "+".green(), path.cyan(), would("added", "would add").dimmed())
            }
            ChangeKind::Updated { diff } => println!(
                "   {} {} {} ({}, {})",
                "~".yellow(),
                path.cyan(),
                would("updated", "would update").dimmed(),
                format!("+{}", diff.insertions).green(),
                format!("-{}", diff.deletions).red()
            ),
            ChangeKind::Unchanged => println!("   {} {} {}", "=".dimmed(), path, "unchanged".dimmed()),
            ChangeKind::Failed { error } => {
                println!("   {} {} failed: {} ({})", "x".red(), path.cyan(), error, change.url.dimmed())
            }
        }
    }

    for stale in &report.stale {
        println!(
            "{} {} is not in the manifest (left in place)",
            "WARN".yellow().bold(),
            stale.display()
        );
    }
    if report.index_updated {
        println!("   {} documentation index updated", "+".green());
    }
    if let Some(error) = &report.index_error {
        println!("{} index not updated: {}", "ERROR".red().bold(), error);
    }

    println!();
    let writes = report.writes().count();
    let failures = report.failures().count();
    match report.outcome {
        SyncOutcome::Failed => println!(
            "{} {} file(s) written, {} failure(s); cooldown not started.",
            "ERROR".red().bold(),
            writes,
            failures
        ),
        _ if report.dry_run => println!(
            "{} Dry run: {} file(s) would change.",
            "OK".green().bold(),
            writes
        ),
        _ => println!(
            "{} Sync complete: {} file(s) written.",
            "OK".green().bold(),
            writes
        ),
    }
}

//! Install command implementation

use colored::Colorize;

use asset_core::{AssetScanner, InstallOptions, InstallReport, LinkInstaller, UnitOutcome};

use crate::cli::InstallArgs;
use crate::error::{CliError, Result};

/// Run the install command
///
/// Scans `--source` for units and links each one under `--target`. Exits
/// non-zero when any unit is left in conflict or failed.
pub fn run_install(args: &InstallArgs) -> Result<()> {
    let scan = AssetScanner::new(&args.marker).scan(&args.source)?;
    let report = LinkInstaller::new(InstallOptions {
        dry_run: args.dry_run,
    })
    .install(&scan.units, &args.target)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Installing {} unit(s) from {} into {}{}",
            "=>".blue().bold(),
            scan.units.len(),
            args.source.display().to_string().cyan(),
            args.target.display().to_string().cyan(),
            if args.dry_run { " (dry run)".dimmed().to_string() } else { String::new() }
        );
        for warning in &scan.warnings {
            println!(
                "{} {}: {}",
                "WARN".yellow().bold(),
                warning.path.display(),
                warning.message
            );
        }
        print_report(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::InstallIncomplete {
            conflicts: report.conflicts(),
            failures: report.failures(),
        })
    }
}

fn print_report(report: &InstallReport) {
    if report.units.is_empty() {
        println!("{} No units found.", "WARN".yellow().bold());
        return;
    }

    let would = |done: &str, planned: &str| {
        if report.dry_run { planned.to_string() } else { done.to_string() }
    };

    for unit in &report.units {
        let name = unit.mapping.name.cyan();
        match &unit.outcome {
            UnitOutcome::Created => {
                println!("   {} {} {}", "+".green(), name, would("created", "would create").dimmed())
            }
            UnitOutcome::AlreadyInstalled => {
                println!("   {} {} {}", "=".dimmed(), name, "already installed".dimmed())
            }
            UnitOutcome::Repointed { previous } => println!(
                "   {} {} {} (was {})",
                "~".yellow(),
                name,
                would("repointed", "would repoint").dimmed(),
                previous.display()
            ),
            UnitOutcome::Conflict => {
                let state = unit.state.as_ref().map(|s| s.label()).unwrap_or("occupied");
                println!(
                    "   {} {} conflict: {} at {}; resolve manually",
                    "!".red(),
                    name,
                    state,
                    unit.mapping.target.display()
                )
            }
            UnitOutcome::DuplicateName { owner } => println!(
                "   {} {} conflict: name already used by {}",
                "!".red(),
                name,
                owner.display()
            ),
            UnitOutcome::Failed { message } => {
                println!("   {} {} failed: {}", "x".red(), name, message)
            }
        }
    }

    println!();
    let summary = format!(
        "{} created, {} already installed, {} repointed, {} conflict(s), {} failure(s)",
        report.created(),
        report.already_installed(),
        report.repointed(),
        report.conflicts(),
        report.failures()
    );
    if report.is_success() {
        println!("{} {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}", "ERROR".red().bold(), summary);
    }
}

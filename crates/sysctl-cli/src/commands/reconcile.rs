//! Check and apply commands

use std::path::Path;

use colored::Colorize;
use sysctl_core::{ApplyReport, Manifest, Reconciler, ResourceStatus};

use crate::cli::Overrides;
use crate::context::resolve_settings;
use crate::error::{CliError, Result};

/// Run the check command: report would-be changes, write nothing
pub fn run_check(manifest: &Path, overrides: &Overrides, json: bool) -> Result<()> {
    let (manifest, reconciler) = load(manifest, overrides)?;

    if !json {
        println!(
            "{} Checking {} resources {}",
            "=>".blue().bold(),
            manifest.resources.len(),
            "(no changes will be written)".dimmed()
        );
    }

    let report = reconciler.check(&manifest.resources)?;
    print_report(&report, json)
}

/// Run the apply command. Fails when any resource failed.
pub fn run_apply(manifest: &Path, overrides: &Overrides, json: bool) -> Result<()> {
    let (manifest, reconciler) = load(manifest, overrides)?;

    if !json {
        println!(
            "{} Applying {} resources...",
            "=>".blue().bold(),
            manifest.resources.len()
        );
    }

    let report = reconciler.apply(&manifest.resources)?;
    print_report(&report, json)?;
    ensure_success(&report)
}

fn load(path: &Path, overrides: &Overrides) -> Result<(Manifest, Reconciler)> {
    let manifest = Manifest::load(path)?;
    let settings = resolve_settings(manifest.settings.clone(), overrides)?;
    let reconciler = Reconciler::from_settings(&settings);
    Ok((manifest, reconciler))
}

/// Print a report as JSON or as a human-readable summary
pub(crate) fn print_report(report: &ApplyReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for resource in &report.resources {
        match resource.status {
            ResourceStatus::Unchanged => {}
            ResourceStatus::Changed => {
                for event in &resource.events {
                    println!("  {} {}: {}", "~".yellow(), resource.name.bold(), event);
                }
                if let Some(diff) = &resource.diff {
                    for line in diff.lines() {
                        println!("    {}", colorize_diff_line(line));
                    }
                }
            }
            ResourceStatus::Failed => {
                println!(
                    "  {} {}: {}",
                    "x".red().bold(),
                    resource.name.bold(),
                    resource.error.as_deref().unwrap_or("failed")
                );
            }
        }
    }

    let changed = report.changed().count();
    let failed = report.failed().count();
    let unchanged = report.resources.len() - changed - failed;
    let verb = if report.noop { "would change" } else { "changed" };
    let summary = format!("{changed} {verb}, {unchanged} unchanged, {failed} failed");

    println!();
    if failed == 0 {
        println!("{} {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}", "FAILED".red().bold(), summary);
    }
    Ok(())
}

pub(crate) fn ensure_success(report: &ApplyReport) -> Result<()> {
    if report.success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} of {} resources failed",
            report.failed().count(),
            report.resources.len()
        )))
    }
}

fn colorize_diff_line(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else {
        line.to_string()
    }
}

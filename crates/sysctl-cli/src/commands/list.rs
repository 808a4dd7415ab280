//! List command

use colored::Colorize;
use sysctl_core::{Entry, Reconciler};

use crate::error::Result;

/// Run the list command
pub fn run_list(reconciler: &Reconciler, json: bool) -> Result<()> {
    let aggregate = reconciler.instances()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&aggregate)?);
        return Ok(());
    }

    println!("{}", "Sysctl Keys".bold());
    println!();

    let width = aggregate
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);

    for entry in &aggregate {
        println!(
            "  {:<width$}  {}  {} {}",
            entry.name.green(),
            entry.value,
            flags(entry).cyan(),
            location(entry).dimmed(),
        );
    }

    println!();
    println!("{} keys", aggregate.len());
    Ok(())
}

fn flags(entry: &Entry) -> String {
    let mut flags = Vec::new();
    if entry.persist {
        flags.push("persist");
    }
    if entry.apply {
        flags.push("apply");
    }
    format!("[{}]", flags.join(","))
}

fn location(entry: &Entry) -> String {
    match &entry.target {
        Some(path) => path.display().to_string(),
        None => "(live)".to_string(),
    }
}

//! Single-resource shortcuts

use std::path::PathBuf;

use colored::Colorize;
use sysctl_core::{Reconciler, Resource};

use super::reconcile::{ensure_success, print_report};
use crate::error::Result;

/// Run the set command
pub fn run_set(reconciler: &Reconciler, resource: Resource) -> Result<()> {
    println!("{} Setting {}", "=>".blue().bold(), resource.name.cyan());
    run_one(reconciler, resource)
}

/// Run the remove command
pub fn run_remove(reconciler: &Reconciler, name: &str, target: Option<PathBuf>) -> Result<()> {
    let mut resource = Resource::new(name).absent();
    resource.target = target;

    println!("{} Removing {}", "=>".blue().bold(), name.cyan());
    run_one(reconciler, resource)
}

fn run_one(reconciler: &Reconciler, resource: Resource) -> Result<()> {
    let report = reconciler.apply(std::slice::from_ref(&resource))?;
    print_report(&report, false)?;
    ensure_success(&report)
}

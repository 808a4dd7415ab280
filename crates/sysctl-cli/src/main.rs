//! sysctl-reconcile CLI
//!
//! Converges kernel parameters in sysctl config files and the running
//! kernel.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use sysctl_core::Resource;

use cli::{Cli, Commands, Overrides};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    execute_command(cli.command, &cli.overrides)
}

fn execute_command(cmd: Commands, overrides: &Overrides) -> Result<()> {
    match cmd {
        Commands::List { json } => commands::run_list(&context::reconciler(overrides)?, json),
        Commands::Check { manifest, json } => commands::run_check(&manifest, overrides, json),
        Commands::Apply { manifest, json } => commands::run_apply(&manifest, overrides, json),
        Commands::Set {
            name,
            value,
            comment,
            target,
            no_apply,
            no_persist,
            silent,
        } => {
            let mut resource = Resource::new(name)
                .with_value(value)
                .with_apply(!no_apply)
                .with_persist(!no_persist)
                .with_silent(silent);
            resource.comment = comment;
            resource.target = target;
            commands::run_set(&context::reconciler(overrides)?, resource)
        }
        Commands::Remove { name, target } => {
            commands::run_remove(&context::reconciler(overrides)?, &name, target)
        }
    }
}

//! CLI argument parsing using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sysctl_kernel::KernelFlavor;

/// Reconcile sysctl settings between config files and the live kernel
#[derive(Parser, Debug)]
#[command(name = "sysctl-reconcile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings overrides shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Manifest whose `[settings]` table replaces the built-in defaults
    #[arg(long, global = true, env = "SYSCTL_RECONCILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The `sysctl` program to run
    #[arg(long, global = true, env = "SYSCTL_RECONCILE_SYSCTL_PATH")]
    pub sysctl_path: Option<PathBuf>,

    /// Legacy config file, also the default write target
    #[arg(long, global = true, env = "SYSCTL_RECONCILE_DEFAULT_FILE")]
    pub default_file: Option<PathBuf>,

    /// Glob matching drop-in fragments
    #[arg(long, global = true, env = "SYSCTL_RECONCILE_DROP_IN_GLOB")]
    pub drop_in_glob: Option<String>,

    /// Kernel flavor (linux, freebsd, openbsd)
    #[arg(long, global = true, env = "SYSCTL_RECONCILE_KERNEL")]
    pub kernel: Option<KernelFlavor>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every key found in config files or the running kernel
    List {
        /// Print the aggregate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what applying a manifest would change, without writing
    Check {
        /// Manifest file (TOML, JSON or YAML)
        manifest: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Converge config files and the live kernel to a manifest
    Apply {
        /// Manifest file (TOML, JSON or YAML)
        manifest: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ensure a single key is present with a value
    Set {
        /// Key name, e.g. net.ipv4.ip_forward
        name: String,

        /// Desired value
        value: String,

        /// Comment to keep above the entry (empty string removes it)
        #[arg(long)]
        comment: Option<String>,

        /// File to persist the key in
        #[arg(long)]
        target: Option<PathBuf>,

        /// Leave the live kernel alone
        #[arg(long)]
        no_apply: bool,

        /// Leave config files alone
        #[arg(long)]
        no_persist: bool,

        /// Ignore keys the kernel does not know
        #[arg(long)]
        silent: bool,
    },

    /// Remove a key (and its comment) from a config file
    Remove {
        /// Key name
        name: String,

        /// File to remove the key from
        #[arg(long)]
        target: Option<PathBuf>,
    },
}

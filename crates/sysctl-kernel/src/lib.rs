//! Live kernel parameter access for sysctl-reconcile
//!
//! This crate wraps the `sysctl` command. It handles:
//!
//! - Per-OS argument variants (Linux, FreeBSD, OpenBSD)
//! - Full dumps and batched existence-checked queries, chunked to stay
//!   under command-line length limits
//! - Single-key reads and writes, with a silent mode that downgrades
//!   write failures to a debug log line
//!
//! Command execution sits behind [`SysctlRunner`] so callers can swap in
//! a scripted kernel.

pub mod error;
pub mod flavor;
pub mod live;
pub mod runner;

pub use error::{KernelError, Result};
pub use flavor::KernelFlavor;
pub use live::{DEFAULT_CHUNK_SIZE, LiveKernel, parse_output};
pub use runner::{SysctlRunner, SystemSysctl};

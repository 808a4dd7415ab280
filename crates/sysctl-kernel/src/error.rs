//! Error types for live kernel operations

use std::path::PathBuf;

/// Errors that can occur while talking to the kernel
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// `sysctl` exited with non-zero status
    #[error("Command `{command}` failed (exit code {code}): {stderr}")]
    ExecutionFailed {
        /// Full command line
        command: String,
        /// Exit code, -1 when killed by a signal
        code: i32,
        /// Captured stderr output
        stderr: String,
    },

    /// The program could not be started at all
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unrecognised kernel flavor name
    #[error("Unknown kernel flavor `{0}` (expected linux, freebsd or openbsd)")]
    UnknownFlavor(String),
}

impl KernelError {
    /// Whether this is a command failure (as opposed to a spawn failure)
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::ExecutionFailed { .. })
    }
}

/// Result type alias for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;

//! Execution seam for the `sysctl` command

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{KernelError, Result};

/// Runs `sysctl` with the given arguments and returns its stdout.
///
/// Implementations must return [`KernelError::ExecutionFailed`] when the
/// command exits non-zero.
pub trait SysctlRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// Runs the real `sysctl` binary as a child process
#[derive(Debug, Clone)]
pub struct SystemSysctl {
    program: PathBuf,
}

impl SystemSysctl {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for SystemSysctl {
    fn default() -> Self {
        Self::new("sysctl")
    }
}

impl SysctlRunner for SystemSysctl {
    fn run(&self, args: &[String]) -> Result<String> {
        tracing::debug!(program = %self.program.display(), ?args, "running sysctl");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| KernelError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            Err(KernelError::ExecutionFailed {
                command: format!("{} {}", self.program.display(), args.join(" ")),
                code,
                stderr,
            })
        }
    }
}

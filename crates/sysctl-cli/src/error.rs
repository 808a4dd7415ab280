//! Error types for sysctl-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from sysctl-core
    #[error(transparent)]
    Core(#[from] sysctl_core::Error),

    /// Error from sysctl-fs
    #[error(transparent)]
    Fs(#[from] sysctl_fs::Error),

    /// Error from sysctl-kernel
    #[error(transparent)]
    Kernel(#[from] sysctl_kernel::KernelError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Logging setup error
    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

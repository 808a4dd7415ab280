//! Error types for sysctl-core

use std::path::PathBuf;

/// Result type for sysctl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sysctl-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The running kernel does not know this key
    #[error("`{name}` is not a valid sysctl key")]
    InvalidKey { name: String },

    /// A resource declaration is malformed
    #[error("Invalid sysctl resource `{name}`: {reason}")]
    InvalidResource { name: String, reason: String },

    /// A config file could not be parsed; never recovered from
    #[error("Failed to load target {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: sysctl_content::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from sysctl-fs
    #[error(transparent)]
    Fs(#[from] sysctl_fs::Error),

    /// Command error from sysctl-kernel
    #[error(transparent)]
    Kernel(#[from] sysctl_kernel::KernelError),

    /// Tree error from sysctl-content
    #[error(transparent)]
    Content(#[from] sysctl_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_resource(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

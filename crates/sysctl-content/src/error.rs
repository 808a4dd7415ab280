//! Error types for sysctl-content

/// Result type for sysctl-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sysctl-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Node index {index} out of bounds (document has {len} nodes)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Node {index} is not a comment")]
    NotAComment { index: usize },
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

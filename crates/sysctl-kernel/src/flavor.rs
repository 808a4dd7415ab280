//! Per-OS `sysctl` argument variants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Operating system family, which decides the `sysctl` flags to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelFlavor {
    Linux,
    FreeBsd,
    OpenBsd,
}

impl KernelFlavor {
    /// Flavor of the host this binary was built for
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "freebsd" => Self::FreeBsd,
            "openbsd" => Self::OpenBsd,
            _ => Self::Linux,
        }
    }

    /// Arguments for a full dump of every key
    pub fn read_all_args(&self) -> Vec<String> {
        match self {
            Self::FreeBsd => vec!["-aeW".to_string()],
            Self::Linux | Self::OpenBsd => vec!["-a".to_string()],
        }
    }

    /// Leading arguments for a query that silently skips unknown keys.
    ///
    /// OpenBSD has no such flag; unknown keys just produce no output there.
    pub fn read_some_args(&self) -> Vec<String> {
        match self {
            Self::Linux => vec!["-e".to_string()],
            Self::FreeBsd => vec!["-ieW".to_string()],
            Self::OpenBsd => Vec::new(),
        }
    }

    /// Arguments for reading one key's bare value
    pub fn get_args(&self, key: &str) -> Vec<String> {
        vec!["-n".to_string(), key.to_string()]
    }

    /// Arguments for writing one key
    pub fn set_args(&self, key: &str, value: &str) -> Vec<String> {
        let assignment = format!("{key}={value}");
        match self {
            Self::OpenBsd => vec![assignment],
            Self::Linux | Self::FreeBsd => vec!["-w".to_string(), assignment],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
        }
    }
}

impl Default for KernelFlavor {
    fn default() -> Self {
        Self::detect()
    }
}

impl FromStr for KernelFlavor {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "freebsd" => Ok(Self::FreeBsd),
            "openbsd" => Ok(Self::OpenBsd),
            _ => Err(KernelError::UnknownFlavor(s.to_string())),
        }
    }
}

impl fmt::Display for KernelFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

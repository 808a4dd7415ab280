//! Config-file layout: one legacy file plus a glob of drop-in fragments

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FILE, DROP_IN_GLOB};
use crate::{Error, Result};

/// Where sysctl settings live on disk.
///
/// Drop-in fragments take discovery precedence over the legacy file: when
/// the same key appears in both, the drop-in wins because it is scanned
/// first and first-found wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    default_file: PathBuf,
    drop_in_glob: String,
}

impl Default for ConfigLayout {
    fn default() -> Self {
        Self::new(DEFAULT_FILE, DROP_IN_GLOB)
    }
}

impl ConfigLayout {
    pub fn new(default_file: impl Into<PathBuf>, drop_in_glob: impl Into<String>) -> Self {
        Self {
            default_file: default_file.into(),
            drop_in_glob: drop_in_glob.into(),
        }
    }

    /// The legacy file, also the write target when a resource names none
    pub fn default_file(&self) -> &Path {
        &self.default_file
    }

    pub fn drop_in_glob(&self) -> &str {
        &self.drop_in_glob
    }

    /// Resolve a resource's target, falling back to the legacy file
    pub fn resolve_target(&self, target: Option<&Path>) -> PathBuf {
        target
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_file.clone())
    }

    /// Existing drop-in files, sorted ascending
    pub fn drop_in_files(&self) -> Result<Vec<PathBuf>> {
        let paths = glob::glob(&self.drop_in_glob).map_err(|e| Error::Pattern {
            pattern: self.drop_in_glob.clone(),
            message: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() && path != self.default_file => files.push(path),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable drop-in");
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Files to scan during full discovery, in discovery order.
    ///
    /// Drop-ins come first in reverse-sorted order (the fragment the loader
    /// applies last is seen first), then the legacy file if it exists.
    pub fn search_path(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.drop_in_files()?;
        files.reverse();
        if self.default_file.is_file() {
            files.push(self.default_file.clone());
        }
        tracing::debug!(count = files.len(), "resolved config search path");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ConfigLayout::default();
        assert_eq!(layout.default_file(), Path::new("/etc/sysctl.conf"));
        assert_eq!(layout.drop_in_glob(), "/etc/sysctl.d/*.conf");
    }

    #[test]
    fn test_resolve_target() {
        let layout = ConfigLayout::new("/tmp/base.conf", "/tmp/d/*.conf");
        assert_eq!(layout.resolve_target(None), PathBuf::from("/tmp/base.conf"));
        assert_eq!(
            layout.resolve_target(Some(Path::new("/tmp/other.conf"))),
            PathBuf::from("/tmp/other.conf")
        );
    }

    #[test]
    fn test_bad_pattern() {
        let layout = ConfigLayout::new("/tmp/base.conf", "/tmp/[*.conf");
        assert!(matches!(layout.drop_in_files(), Err(Error::Pattern { .. })));
    }
}

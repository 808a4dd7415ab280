//! [`TestLayout`]: a throwaway legacy file plus drop-in directory

use std::fs;
use std::path::{Path, PathBuf};

use sysctl_fs::ConfigLayout;
use tempfile::TempDir;

/// Temporary config tree shaped like `/etc`:
///
/// ```text
/// <root>/sysctl.conf
/// <root>/sysctl.d/*.conf
/// ```
///
/// The legacy file is not created until [`TestLayout::write_default`] is
/// called.
pub struct TestLayout {
    temp_dir: TempDir,
}

impl Default for TestLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLayout {
    /// Create an empty tree with the drop-in directory in place.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("TestLayout: tempdir: {e}"));
        fs::create_dir(temp_dir.path().join("sysctl.d"))
            .unwrap_or_else(|e| panic!("TestLayout: failed to create sysctl.d: {e}"));
        Self { temp_dir }
    }

    /// Tree whose legacy file holds `content`
    pub fn with_default(content: &str) -> Self {
        let layout = Self::new();
        layout.write_default(content);
        layout
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn default_file(&self) -> PathBuf {
        self.root().join("sysctl.conf")
    }

    pub fn drop_in_dir(&self) -> PathBuf {
        self.root().join("sysctl.d")
    }

    /// Layout pointing at this tree
    pub fn layout(&self) -> ConfigLayout {
        ConfigLayout::new(
            self.default_file(),
            format!("{}/*.conf", self.drop_in_dir().display()),
        )
    }

    pub fn write_default(&self, content: &str) {
        write(&self.default_file(), content);
    }

    /// Write `<root>/sysctl.d/<name>` and return its path
    pub fn write_drop_in(&self, name: &str, content: &str) -> PathBuf {
        let path = self.drop_in_dir().join(name);
        write(&path, content);
        path
    }

    /// Read a file, panicking with the path on failure
    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("TestLayout: could not read {}: {e}", path.display()))
    }

    pub fn read_default(&self) -> String {
        self.read(&self.default_file())
    }
}

fn write(path: &Path, content: &str) {
    fs::write(path, content)
        .unwrap_or_else(|e| panic!("TestLayout: could not write {}: {e}", path.display()));
}

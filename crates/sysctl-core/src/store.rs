//! Scoped handle on one config file

use std::path::{Path, PathBuf};

use sysctl_content::{Document, FileDiff};
use sysctl_fs::io;

use crate::{Error, Result};

/// A config file opened for one logical operation.
///
/// A missing file opens as an empty document and is created on save.
/// Dropping the handle without [`ConfFile::save`] discards all edits.
#[derive(Debug)]
pub struct ConfFile {
    path: PathBuf,
    document: Document,
}

impl ConfFile {
    pub fn open(path: &Path) -> Result<Self> {
        let source = io::read_text_if_exists(path)?;
        tracing::debug!(path = %path.display(), exists = source.is_some(), "opened config file");

        let document = Document::parse(source.as_deref().unwrap_or_default()).map_err(|source| {
            Error::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Unified diff of pending edits, empty when unchanged
    pub fn diff(&self) -> String {
        FileDiff::unified(
            self.document.original_source(),
            &self.document.render(),
            &self.path.display().to_string(),
        )
    }

    /// Write the document back if it changed.
    ///
    /// Returns whether anything was written.
    pub fn save(self) -> Result<bool> {
        if !self.document.is_modified() {
            tracing::debug!(path = %self.path.display(), "config file unchanged, not saving");
            return Ok(false);
        }
        io::write_atomic(&self.path, self.document.render().as_bytes())?;
        Ok(true)
    }
}

//! Edit records for tree mutations.

use serde::{Deserialize, Serialize};

/// The kind of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// A node was inserted.
    Insert,
    /// A node was replaced in place.
    Replace,
    /// A node was removed.
    Delete,
}

/// A single mutation applied to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// The kind of edit.
    pub kind: EditKind,
    /// Node index the edit applied to (position after the edit for inserts).
    pub index: usize,
    /// Rendered line before the edit (Replace and Delete).
    pub old_line: Option<String>,
    /// Rendered line after the edit (Insert and Replace).
    pub new_line: Option<String>,
}

impl Edit {
    pub fn insert(index: usize, new_line: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            index,
            old_line: None,
            new_line: Some(new_line.into()),
        }
    }

    pub fn replace(index: usize, old_line: impl Into<String>, new_line: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Replace,
            index,
            old_line: Some(old_line.into()),
            new_line: Some(new_line.into()),
        }
    }

    pub fn delete(index: usize, old_line: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            index,
            old_line: Some(old_line.into()),
            new_line: None,
        }
    }

    /// Whether the edit leaves the rendered text unchanged
    pub fn is_noop(&self) -> bool {
        self.kind == EditKind::Replace && self.old_line == self.new_line
    }
}

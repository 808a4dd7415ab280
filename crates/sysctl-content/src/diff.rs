//! Line diff between two renderings of a config file

use similar::{ChangeTag, TextDiff};

/// Result of comparing two versions of a file
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    /// Are the two versions identical?
    pub is_equivalent: bool,
    /// Added and removed lines, in diff order
    pub changes: Vec<LineChange>,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f64,
}

/// A single changed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    Added(String),
    Removed(String),
}

impl FileDiff {
    /// Create a diff indicating the versions are identical
    pub fn equivalent() -> Self {
        Self {
            is_equivalent: true,
            changes: Vec::new(),
            similarity: 1.0,
        }
    }

    /// Compute a line-by-line diff
    pub fn compute(old: &str, new: &str) -> Self {
        if old == new {
            return Self::equivalent();
        }

        let text_diff = TextDiff::from_lines(old, new);
        let similarity = f64::from(text_diff.ratio());

        let changes: Vec<LineChange> = text_diff
            .iter_all_changes()
            .filter_map(|change| {
                let line = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Delete => Some(LineChange::Removed(line)),
                    ChangeTag::Insert => Some(LineChange::Added(line)),
                    ChangeTag::Equal => None,
                }
            })
            .collect();

        Self {
            is_equivalent: changes.is_empty(),
            changes,
            similarity,
        }
    }

    /// Render a unified diff with `label` used for both file headers
    pub fn unified(old: &str, new: &str, label: &str) -> String {
        if old == new {
            return String::new();
        }
        TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(2)
            .header(label, label)
            .to_string()
    }
}

impl Default for FileDiff {
    fn default() -> Self {
        Self::equivalent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_equivalent() {
        let diff = FileDiff::compute("a = 1\n", "a = 1\n");
        assert!(diff.is_equivalent);
        assert_eq!(diff.similarity, 1.0);
    }

    #[test]
    fn test_changed_value() {
        let diff = FileDiff::compute("a = 1\nb = 2\n", "a = 1\nb = 3\n");
        assert!(!diff.is_equivalent);
        assert_eq!(
            diff.changes,
            vec![
                LineChange::Removed("b = 2".into()),
                LineChange::Added("b = 3".into()),
            ]
        );
    }

    #[test]
    fn test_unified_has_headers() {
        let out = FileDiff::unified("a = 1\n", "a = 2\n", "/etc/sysctl.conf");
        assert!(out.contains("--- /etc/sysctl.conf"));
        assert!(out.contains("+a = 2"));
        assert!(out.contains("-a = 1"));
    }

    #[test]
    fn test_unified_empty_when_equal() {
        assert!(FileDiff::unified("x\n", "x\n", "f").is_empty());
    }
}

//! Ordered node tree for a single sysctl configuration file

use crate::edit::Edit;
use crate::error::{Error, Result};
use crate::node::{Entry, Node};

/// A node plus the exact text it was parsed from.
///
/// `raw` is dropped as soon as the node is touched so that the node renders
/// canonically from then on.
#[derive(Debug, Clone)]
struct Line {
    node: Node,
    raw: Option<String>,
}

impl Line {
    fn fresh(node: Node) -> Self {
        Self { node, raw: None }
    }

    fn render(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.node.render(),
        }
    }
}

/// Parsed sysctl configuration file
#[derive(Debug, Clone)]
pub struct Document {
    /// Source as provided to parse (for is_modified tracking)
    original_source: String,
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            original_source: String::new(),
            lines: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl Document {
    /// Parse file content.
    ///
    /// Any non-blank line that is neither a comment nor a `key = value`
    /// assignment fails the whole parse; a half-understood file is never
    /// edited.
    pub fn parse(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Ok(Self::default());
        }

        let trailing_newline = source.ends_with('\n');
        let body = source.strip_suffix('\n').unwrap_or(source);

        let mut lines = Vec::new();
        for (idx, raw) in body.split('\n').enumerate() {
            let node = Node::parse_line(raw, idx + 1)?;
            lines.push(Line {
                node,
                raw: Some(raw.to_string()),
            });
        }

        Ok(Self {
            original_source: source.to_string(),
            lines,
            trailing_newline,
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Node at `index`
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.lines.get(index).map(|l| &l.node)
    }

    /// All nodes in file order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.lines.iter().map(|l| &l.node)
    }

    /// Entry keys in file order, each key listed once
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.nodes().filter_map(Node::key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Index of the first entry for `key`
    pub fn position(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.node.key() == Some(key))
    }

    /// Value of the first entry for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|l| match &l.node {
            Node::Entry(entry) if entry.key == key => Some(entry.value.as_str()),
            _ => None,
        })
    }

    /// The comment node directly preceding the entry for `key`, if any.
    ///
    /// Blank lines break adjacency: only the immediately previous node counts.
    pub fn preceding_comment(&self, key: &str) -> Option<(usize, &str)> {
        let pos = self.position(key)?;
        let index = pos.checked_sub(1)?;
        self.lines[index]
            .node
            .comment_text()
            .map(|text| (index, text))
    }

    /// Index of the first comment whose text satisfies `predicate`
    pub fn find_comment<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&str) -> bool,
    {
        self.lines
            .iter()
            .position(|l| l.node.comment_text().is_some_and(&mut predicate))
    }

    /// Set the value for `key`, updating the first entry in place or
    /// appending a new entry at the end of the file.
    pub fn set(&mut self, key: &str, value: &str) -> Edit {
        match self.position(key) {
            Some(index) => {
                let line = &mut self.lines[index];
                let old = line.render();
                if let Node::Entry(entry) = &mut line.node
                    && entry.value != value
                {
                    entry.value = value.to_string();
                    line.raw = None;
                }
                Edit::replace(index, old, line.render())
            }
            None => self.push(Node::entry(key, value)),
        }
    }

    /// Append a node at the end of the file
    pub fn push(&mut self, node: Node) -> Edit {
        let line = Line::fresh(node);
        let rendered = line.render();
        self.lines.push(line);
        Edit::insert(self.lines.len() - 1, rendered)
    }

    /// Insert `node` directly after the node at `index`
    pub fn insert_after(&mut self, index: usize, node: Node) -> Result<Edit> {
        self.check_index(index)?;
        Ok(self.insert_at(index + 1, node))
    }

    /// Insert `node` directly before the node at `index`
    pub fn insert_before(&mut self, index: usize, node: Node) -> Result<Edit> {
        self.check_index(index)?;
        Ok(self.insert_at(index, node))
    }

    fn insert_at(&mut self, index: usize, node: Node) -> Edit {
        let line = Line::fresh(node);
        let rendered = line.render();
        self.lines.insert(index, line);
        Edit::insert(index, rendered)
    }

    /// Replace the text of the comment node at `index`
    pub fn set_comment_text(&mut self, index: usize, text: &str) -> Result<Edit> {
        self.check_index(index)?;
        let line = &mut self.lines[index];
        let old = line.render();
        let Node::Comment(comment) = &mut line.node else {
            return Err(Error::NotAComment { index });
        };
        if comment.text != text {
            comment.text = text.to_string();
            line.raw = None;
        }
        Ok(Edit::replace(index, old, line.render()))
    }

    /// Remove the node at `index`
    pub fn remove(&mut self, index: usize) -> Result<Edit> {
        self.check_index(index)?;
        let line = self.lines.remove(index);
        Ok(Edit::delete(index, line.render()))
    }

    /// Remove every entry for `key`
    pub fn remove_key(&mut self, key: &str) -> Vec<Edit> {
        let mut edits = Vec::new();
        while let Some(index) = self.position(key) {
            let line = self.lines.remove(index);
            edits.push(Edit::delete(index, line.render()));
        }
        edits
    }

    /// Entry node for `key`
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.lines.iter().find_map(|l| match &l.node {
            Node::Entry(entry) if entry.key == key => Some(entry),
            _ => None,
        })
    }

    /// Render to string, untouched lines verbatim
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(Line::render)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Source the document was parsed from
    pub fn original_source(&self) -> &str {
        &self.original_source
    }

    /// Check if the rendered document differs from its original source.
    pub fn is_modified(&self) -> bool {
        self.render() != self.original_source
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.lines.len(),
            })
        }
    }
}

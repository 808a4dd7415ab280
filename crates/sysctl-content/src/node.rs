//! Typed nodes of a sysctl configuration tree

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single line of a sysctl configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A `key = value` assignment
    Entry(Entry),
    /// A `#` or `;` comment line
    Comment(Comment),
    /// An empty or whitespace-only line
    Blank,
}

/// A `key = value` assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Dotted key, e.g. `net.ipv4.ip_forward`
    pub key: String,
    /// Raw value text, internal whitespace kept verbatim
    pub value: String,
    /// Leading `-`: the boot-time loader ignores failures for this key
    #[serde(default)]
    pub ignore_failure: bool,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ignore_failure: false,
        }
    }
}

/// A comment line with its marker and surrounding whitespace stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Node {
    /// Build an entry node
    pub fn entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Entry(Entry::new(key, value))
    }

    /// Build a comment node
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(Comment::new(text))
    }

    /// Key of an entry node
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Entry(entry) => Some(&entry.key),
            _ => None,
        }
    }

    /// Text of a comment node
    pub fn comment_text(&self) -> Option<&str> {
        match self {
            Self::Comment(comment) => Some(&comment.text),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Parse one line. `number` is 1-based and only used for error reporting.
    pub fn parse_line(line: &str, number: usize) -> Result<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Self::Blank);
        }

        if let Some(rest) = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix(';'))
        {
            return Ok(Self::comment(rest.trim()));
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(Error::parse(
                number,
                format!("expected `key = value`, found `{trimmed}`"),
            ));
        };

        let key = key.trim();
        let (ignore_failure, key) = match key.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, key),
        };

        if key.is_empty() {
            return Err(Error::parse(number, "missing key before `=`"));
        }
        if key.contains(char::is_whitespace) {
            return Err(Error::parse(
                number,
                format!("key `{key}` contains whitespace"),
            ));
        }

        Ok(Self::Entry(Entry {
            key: key.to_string(),
            value: value.trim().to_string(),
            ignore_failure,
        }))
    }

    /// Render the node in canonical form
    pub fn render(&self) -> String {
        match self {
            Self::Entry(entry) => {
                let prefix = if entry.ignore_failure { "-" } else { "" };
                if entry.value.is_empty() {
                    format!("{prefix}{} =", entry.key)
                } else {
                    format!("{prefix}{} = {}", entry.key, entry.value)
                }
            }
            Self::Comment(comment) if comment.text.is_empty() => "#".to_string(),
            Self::Comment(comment) => format!("# {}", comment.text),
            Self::Blank => String::new(),
        }
    }
}

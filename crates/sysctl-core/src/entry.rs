//! Discovered per-key state and the batch aggregate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::resource::Ensure;

/// Current state of one key as seen across files and the live kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    /// File value when persisted, otherwise the live value
    pub value: String,
    /// Prefixed comment directly above the file entry, prefix stripped
    pub comment: Option<String>,
    /// File the entry was found in; `None` for live-only keys
    pub target: Option<PathBuf>,
    pub ensure: Ensure,
    /// Backed by a file entry
    pub persist: bool,
    /// Retrievable from the live kernel
    pub apply: bool,
    /// Live value as reported during discovery
    pub live_value: Option<String>,
}

impl Entry {
    /// Entry found in a config file
    pub fn persisted(
        name: impl Into<String>,
        value: impl Into<String>,
        comment: Option<String>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment,
            target: Some(target.into()),
            ensure: Ensure::Present,
            persist: true,
            apply: false,
            live_value: None,
        }
    }

    /// Entry known only to the running kernel
    pub fn live(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            live_value: Some(value.clone()),
            value,
            comment: None,
            target: None,
            ensure: Ensure::Present,
            persist: false,
            apply: true,
        }
    }

    /// Whether this entry is backed by `target` specifically
    pub fn persisted_in(&self, target: &Path) -> bool {
        self.persist && self.target.as_deref() == Some(target)
    }
}

/// Per-key state for one reconciliation batch.
///
/// Keys are unique; insertion order is discovery order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Aggregate {
    entries: Vec<Entry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Add an entry unless its name was already collected.
    ///
    /// Returns whether the entry was added.
    pub fn insert(&mut self, entry: Entry) -> bool {
        if self.index.contains_key(&entry.name) {
            return false;
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Fold in one live `(key, value)` pair.
    ///
    /// A key already collected from a file is marked as applied; an unseen
    /// key becomes a live-only entry.
    pub fn merge_live(&mut self, name: &str, value: &str) {
        match self.index.get(name) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.apply = true;
                entry.live_value = Some(value.to_string());
            }
            None => {
                self.insert(Entry::live(name, value));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Aggregate {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

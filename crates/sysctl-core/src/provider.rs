//! Per-resource provider: validity guard, property access and flush

use std::path::{Path, PathBuf};

use regex::Regex;
use sysctl_content::{Document, Node};
use sysctl_kernel::LiveKernel;

use crate::entry::Entry;
use crate::resource::{Ensure, Resource};
use crate::scan::associated_comment;
use crate::store::ConfFile;
use crate::{Error, Result};

/// Properties a provider can read and stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Value,
    Comment,
}

/// Lifecycle interface driven by the resolver.
///
/// Setters only stage changes; nothing touches a file or the kernel until
/// [`Provider::flush`].
pub trait Provider {
    /// Whether the managed state is present
    fn exists(&self) -> Result<bool>;

    fn create(&mut self) -> Result<()>;

    fn destroy(&mut self) -> Result<()>;

    /// Current configuration-side value of `property`
    fn get(&self, property: Property) -> Option<String>;

    fn set(&mut self, property: Property, value: &str);

    /// Whether the target file currently holds the key
    fn is_persisted(&self) -> bool;

    /// Current live value
    fn live_value(&self) -> Result<String>;

    /// Commit staged changes: kernel first, then the file
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
struct Pending {
    destroy: bool,
    value: Option<String>,
    comment: Option<String>,
}

/// Provider for one sysctl resource against its prefetched entry
pub struct SysctlProvider<'a> {
    resource: &'a Resource,
    entry: Option<&'a Entry>,
    target: PathBuf,
    kernel: &'a LiveKernel,
    pending: Pending,
}

impl<'a> SysctlProvider<'a> {
    pub fn new(
        resource: &'a Resource,
        entry: Option<&'a Entry>,
        target: PathBuf,
        kernel: &'a LiveKernel,
    ) -> Self {
        Self {
            resource,
            entry,
            target,
            kernel,
            pending: Pending::default(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Whether the kernel or a scanned file knows this key
    fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    fn name(&self) -> &str {
        &self.resource.name
    }

    /// Unified diff of what [`Provider::flush`] would write to the file
    pub fn preview(&self) -> Result<String> {
        if !self.writes_file() {
            return Ok(String::new());
        }
        let mut file = ConfFile::open(&self.target)?;
        self.stage(file.document_mut())?;
        Ok(file.diff())
    }

    fn writes_file(&self) -> bool {
        self.pending.destroy || self.resource.persist
    }

    /// Apply staged file changes to `document`
    fn stage(&self, document: &mut Document) -> Result<()> {
        let name = self.name();

        if self.pending.destroy {
            if let Some((index, _)) = associated_comment(document, name) {
                document.remove(index)?;
            }
            let removed = document.remove_key(name);
            tracing::debug!(key = name, nodes = removed.len(), "removed entry");
            return Ok(());
        }

        if document.position(name).is_none() {
            let value = self
                .pending
                .value
                .as_deref()
                .or(self.resource.desired_value())
                .or(self.entry.map(|e| e.value.as_str()))
                .unwrap_or_default();
            insert_entry(document, name, value)?;
        }

        if let Some(value) = &self.pending.value {
            document.set(name, value);
        }

        if let Some(comment) = &self.pending.comment {
            set_comment(document, name, comment)?;
        }

        Ok(())
    }
}

impl Provider for SysctlProvider<'_> {
    fn exists(&self) -> Result<bool> {
        let resource = self.resource;

        if resource.ensure != Ensure::Absent && !self.is_valid() {
            if resource.silent {
                tracing::debug!(key = %resource.name, "not a valid sysctl key, continuing in silent mode");
                return Ok(true);
            }
            return Err(Error::InvalidKey {
                name: resource.name.clone(),
            });
        }

        match self.entry {
            Some(entry) if resource.ensure == Ensure::Absent && !entry.persist => Ok(false),
            Some(entry) if entry.persisted_in(&self.target) || resource.ensure == Ensure::Present => {
                Ok(true)
            }
            // Unknown here or found in another file: ask the target directly
            _ => {
                let file = ConfFile::open(&self.target)?;
                Ok(file.document().position(&resource.name).is_some())
            }
        }
    }

    fn create(&mut self) -> Result<()> {
        if self.resource.persist {
            if !self.is_valid() && !self.resource.silent {
                return Err(Error::InvalidKey {
                    name: self.resource.name.clone(),
                });
            }
            // the entry itself is inserted by flush
            tracing::debug!(key = self.name(), target = %self.target.display(), "staged new entry");
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.pending.destroy = true;
        Ok(())
    }

    fn get(&self, property: Property) -> Option<String> {
        let entry = self.entry?;
        match property {
            Property::Value => Some(entry.value.clone()),
            Property::Comment if entry.persisted_in(&self.target) => entry.comment.clone(),
            Property::Comment => None,
        }
    }

    fn set(&mut self, property: Property, value: &str) {
        match property {
            Property::Value => self.pending.value = Some(value.to_string()),
            Property::Comment => self.pending.comment = Some(value.to_string()),
        }
    }

    fn is_persisted(&self) -> bool {
        self.entry.is_some_and(|e| e.persisted_in(&self.target))
    }

    fn live_value(&self) -> Result<String> {
        let unknown_live = !self.entry.is_some_and(|e| e.apply);
        if self.resource.silent
            && unknown_live
            && let Some(value) = self.resource.desired_value()
        {
            tracing::debug!(key = self.name(), "not reading live value in silent mode");
            return Ok(value.to_string());
        }
        Ok(self.kernel.get(self.name())?)
    }

    fn flush(&mut self) -> Result<()> {
        let resource = self.resource;

        if !self.pending.destroy
            && resource.apply
            && let Some(value) = resource.desired_value()
        {
            self.kernel.set(&resource.name, value, resource.silent)?;
        }

        if self.writes_file() {
            let mut file = ConfFile::open(&self.target)?;
            self.stage(file.document_mut())?;
            file.save()?;
        }

        self.pending = Pending::default();
        Ok(())
    }
}

/// Insert a new entry, preferring the spot right after a commented-out
/// line for the same key
fn insert_entry(document: &mut Document, name: &str, value: &str) -> Result<()> {
    let pattern = Regex::new(&format!("^{}([^a-z.].*)?$", regex::escape(name)))
        .map_err(|e| Error::invalid_resource(name, e.to_string()))?;
    let node = Node::entry(name, value);

    match document.find_comment(|text| pattern.is_match(text)) {
        Some(index) => {
            document.insert_after(index, node)?;
        }
        None => {
            document.push(node);
        }
    }
    Ok(())
}

/// Set, replace or remove the prefixed comment above `name`
fn set_comment(document: &mut Document, name: &str, comment: &str) -> Result<()> {
    let existing = associated_comment(document, name).map(|(index, _)| index);

    if comment.is_empty() {
        if let Some(index) = existing {
            document.remove(index)?;
        }
        return Ok(());
    }

    let text = format!("{name}: {comment}");
    match existing {
        Some(index) => {
            document.set_comment_text(index, &text)?;
        }
        None => {
            let position = document
                .position(name)
                .ok_or_else(|| sysctl_content::Error::KeyNotFound {
                    key: name.to_string(),
                })?;
            document.insert_before(position, Node::comment(text))?;
        }
    }
    Ok(())
}

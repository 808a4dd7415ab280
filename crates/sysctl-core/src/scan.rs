//! File-state scanner: collects entries and their prefixed comments

use std::path::Path;

use sysctl_content::Document;
use sysctl_fs::ConfigLayout;

use crate::Result;
use crate::entry::{Aggregate, Entry};
use crate::store::ConfFile;

/// The comment attached to `key`, as `(node index, text without prefix)`.
///
/// Only the node directly above the entry counts, and only when its text
/// starts with `<key>:`.
pub fn associated_comment(document: &Document, key: &str) -> Option<(usize, String)> {
    let (index, text) = document.preceding_comment(key)?;
    let rest = text.strip_prefix(key)?.strip_prefix(':')?;
    Some((index, rest.trim_start().to_string()))
}

/// Collect `candidates` present in `document` into `aggregate`.
///
/// Names already in the aggregate are skipped, so the first file scanned
/// wins. Returns the number of entries added.
pub fn collect_document<S: AsRef<str>>(
    document: &Document,
    path: &Path,
    candidates: &[S],
    aggregate: &mut Aggregate,
) -> usize {
    let mut added = 0;
    for name in candidates.iter().map(AsRef::as_ref) {
        if aggregate.contains(name) {
            continue;
        }
        let Some(value) = document.get(name) else {
            continue;
        };
        let comment = associated_comment(document, name).map(|(_, text)| text);
        if aggregate.insert(Entry::persisted(name, value, comment, path)) {
            added += 1;
        }
    }
    added
}

/// Open `path` and collect `candidates` from it
pub fn collect<S: AsRef<str>>(
    path: &Path,
    candidates: &[S],
    aggregate: &mut Aggregate,
) -> Result<usize> {
    let file = ConfFile::open(path)?;
    let added = collect_document(file.document(), path, candidates, aggregate);
    tracing::debug!(path = %path.display(), count = added, "collected file entries");
    Ok(added)
}

/// Collect every key from every file on the layout's search path
pub fn discover_all(layout: &ConfigLayout, aggregate: &mut Aggregate) -> Result<usize> {
    let mut added = 0;
    for path in layout.search_path()? {
        let file = ConfFile::open(&path)?;
        let keys = file.document().keys();
        added += collect_document(file.document(), &path, keys.as_slice(), aggregate);
    }
    tracing::debug!(count = added, "discovered file entries");
    Ok(added)
}

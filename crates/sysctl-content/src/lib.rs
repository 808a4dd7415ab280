//! Format-preserving editing of sysctl configuration files
//!
//! Parses `key = value` files into an ordered sequence of typed nodes
//! (entries, comments, blank lines), supports sibling-aware queries and
//! mutations, and renders the tree back with untouched lines kept
//! byte-for-byte.

pub mod diff;
pub mod document;
pub mod edit;
pub mod error;
pub mod node;

pub use diff::{FileDiff, LineChange};
pub use document::Document;
pub use edit::{Edit, EditKind};
pub use error::{Error, Result};
pub use node::{Comment, Entry, Node};

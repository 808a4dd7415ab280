//! Desired-state resolver: compares wanted and current state and stages
//! the difference on a provider

use std::fmt;

use crate::Result;
use crate::provider::{Property, Provider};
use crate::resource::{Ensure, Resource};

/// Collapse whitespace runs to a single space
pub fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether two kernel values are equal after whitespace normalization
pub fn same_value(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// A comment transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentChange {
    Defined { new: String },
    Undefined { old: String },
    Changed { old: String, new: String },
}

/// One observable change to a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created,
    Removed,
    Value {
        /// Previous configuration value, when the file side changes
        config: Option<String>,
        /// Previous live value, when the kernel side changes
        live: Option<String>,
        to: String,
    },
    Comment(CommentChange),
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Removed => f.write_str("removed"),
            Self::Value { config, live, to } => match (config, live) {
                (Some(config), Some(live)) => write!(
                    f,
                    "changed configuration value from '{config}' to '{to}' and live value from '{live}' to '{to}'"
                ),
                (Some(config), None) => {
                    write!(f, "changed configuration value from '{config}' to '{to}'")
                }
                (None, Some(live)) => write!(f, "changed live value from '{live}' to '{to}'"),
                (None, None) => write!(f, "value unchanged at '{to}'"),
            },
            Self::Comment(CommentChange::Defined { new }) => {
                write!(f, "defined 'comment' as '{new}'")
            }
            Self::Comment(CommentChange::Undefined { old }) => {
                write!(f, "undefined 'comment' from '{old}'")
            }
            Self::Comment(CommentChange::Changed { old, new }) => {
                write!(f, "comment changed '{old}' to '{new}'")
            }
        }
    }
}

/// Compare `resource` with the provider's current state and stage changes.
///
/// Returns the change events; an empty list means the resource is in sync
/// and must not be flushed.
pub fn resolve(provider: &mut dyn Provider, resource: &Resource) -> Result<Vec<ChangeEvent>> {
    let exists = provider.exists()?;

    match resource.ensure {
        Ensure::Absent if exists => {
            provider.destroy()?;
            return Ok(vec![ChangeEvent::Removed]);
        }
        Ensure::Absent => return Ok(Vec::new()),
        Ensure::Present if !exists => {
            provider.create()?;
            return Ok(vec![ChangeEvent::Created]);
        }
        Ensure::Present => {}
    }

    let mut events = Vec::new();

    if let Some(want) = resource.desired_value() {
        let config = if resource.persist {
            let current = provider.get(Property::Value).unwrap_or_default();
            (!provider.is_persisted() || !same_value(&current, want)).then_some(current)
        } else {
            None
        };

        let live = if resource.apply {
            let current = provider.live_value()?;
            (!same_value(&current, want)).then_some(current)
        } else {
            None
        };

        if config.is_some() || live.is_some() {
            provider.set(Property::Value, want);
            events.push(ChangeEvent::Value {
                config,
                live,
                to: want.to_string(),
            });
        }
    }

    if resource.persist
        && let Some(want) = resource.comment.as_deref()
    {
        let current = provider.get(Property::Comment).filter(|c| !c.is_empty());
        let change = match current {
            None if want.is_empty() => None,
            None => Some(CommentChange::Defined {
                new: want.to_string(),
            }),
            Some(old) if want.is_empty() => Some(CommentChange::Undefined { old }),
            Some(old) if old != want => Some(CommentChange::Changed {
                old,
                new: want.to_string(),
            }),
            Some(_) => None,
        };
        if let Some(change) = change {
            provider.set(Property::Comment, want);
            events.push(ChangeEvent::Comment(change));
        }
    }

    Ok(events)
}

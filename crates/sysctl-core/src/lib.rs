//! Reconciliation engine for sysctl-reconcile
//!
//! Converges kernel parameters across two independent stores, the config
//! files under `/etc` and the running kernel, implementing:
//!
//! - **Prefetch**: one scan of the relevant files plus one batched live
//!   query per run, merged into an [`Aggregate`]
//! - **Validity guard**: keys unknown to both stores fail unless the
//!   resource is silent
//! - **Resolver**: per-resource comparison producing [`ChangeEvent`]s
//! - **Flush**: live write first, then the file edit, so a rejected kernel
//!   write leaves the file untouched
//!
//! # Architecture
//!
//! ```text
//!                 sysctl-cli
//!                     |
//!                sysctl-core
//!                     |
//!     +---------------+---------------+
//!     |               |               |
//! sysctl-fs    sysctl-content   sysctl-kernel
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sysctl_core::{Reconciler, Resource, Settings};
//!
//! let reconciler = Reconciler::from_settings(&Settings::default());
//! let report = reconciler.apply(&[Resource::new("net.ipv4.ip_forward").with_value("1")])?;
//! assert!(report.success());
//! ```

pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod prefetch;
pub mod provider;
pub mod report;
pub mod resolve;
pub mod resource;
pub mod scan;
pub mod store;

pub use config::{Manifest, Settings};
pub use engine::Reconciler;
pub use entry::{Aggregate, Entry};
pub use error::{Error, Result};
pub use provider::{Property, Provider, SysctlProvider};
pub use report::{ApplyReport, ResourceReport, ResourceStatus};
pub use resolve::{ChangeEvent, CommentChange, normalize, same_value};
pub use resource::{Ensure, Resource};
pub use store::ConfFile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_key_displays_name() {
        let error = Error::InvalidKey {
            name: "fs.this_cannot_exist".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "`fs.this_cannot_exist` is not a valid sysctl key"
        );
    }
}

//! Shared test utilities for the sysctl-reconcile workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each hand-roll a kernel and a config tree. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`fixtures`]: canned configuration file contents
//! - [`kernel`]: [`FakeSysctl`], an in-memory kernel behind the runner seam
//! - [`layout`]: [`TestLayout`], a temporary legacy file plus drop-in directory
//! - [`script`]: an executable fake `sysctl` for binary tests

pub mod fixtures;
pub mod kernel;
pub mod layout;
pub mod script;

pub use kernel::FakeSysctl;
pub use layout::TestLayout;
pub use script::{fake_sysctl_calls, fake_sysctl_value, install_fake_sysctl};

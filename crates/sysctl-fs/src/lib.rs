//! Filesystem layer for sysctl-reconcile
//!
//! Provides config-file layout discovery (legacy file plus drop-in glob),
//! safe atomic writes, and format-agnostic settings loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::{DEFAULT_FILE, DEFAULT_SYSCTL, DROP_IN_GLOB};
pub use error::{Error, Result};
pub use layout::ConfigLayout;

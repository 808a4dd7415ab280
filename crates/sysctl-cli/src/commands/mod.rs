//! Command implementations for sysctl-cli

pub mod list;
pub mod reconcile;
pub mod resource;

pub use list::run_list;
pub use reconcile::{run_apply, run_check};
pub use resource::{run_remove, run_set};

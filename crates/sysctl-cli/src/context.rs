//! Settings resolution
//!
//! Precedence, lowest first: built-in defaults, a manifest's own
//! `[settings]` table, the `--config` manifest's `[settings]`, then
//! individual flags and their environment variables.

use sysctl_core::{Manifest, Reconciler, Settings};

use crate::cli::Overrides;
use crate::error::Result;

/// Apply `overrides` on top of `base`
pub fn resolve_settings(base: Settings, overrides: &Overrides) -> Result<Settings> {
    let mut settings = match &overrides.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            Manifest::load(path)?.settings
        }
        None => base,
    };

    if let Some(path) = &overrides.sysctl_path {
        settings.sysctl_path = path.clone();
    }
    if let Some(path) = &overrides.default_file {
        settings.default_file = path.clone();
    }
    if let Some(glob) = &overrides.drop_in_glob {
        settings.drop_in_glob = glob.clone();
    }
    if let Some(flavor) = overrides.kernel {
        settings.kernel = Some(flavor);
    }
    Ok(settings)
}

/// Reconciler for commands that have no manifest of their own
pub fn reconciler(overrides: &Overrides) -> Result<Reconciler> {
    let settings = resolve_settings(Settings::default(), overrides)?;
    Ok(Reconciler::from_settings(&settings))
}

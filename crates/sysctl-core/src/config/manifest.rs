//! Manifest parsing for resource files

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sysctl_fs::ConfigStore;

use super::Settings;
use crate::resource::Resource;
use crate::{Error, Result};

/// A declared batch of sysctl resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "sysctl")]
    pub resources: Vec<Resource>,
}

impl Manifest {
    /// Parse a manifest from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let manifest: Manifest = ConfigStore::new().load(path)?;
        manifest.validate()?;
        tracing::debug!(path = %path.display(), resources = manifest.resources.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Reject names declared more than once.
    ///
    /// Per-resource checks run later so one bad resource does not sink the
    /// whole batch.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if !seen.insert(resource.name.as_str()) {
                return Err(Error::invalid_resource(
                    &resource.name,
                    "declared more than once",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Ensure;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(
            r#"
[settings]
drop_in_glob = "/run/sysctl.d/*.conf"

[[sysctl]]
name = "net.ipv4.ip_forward"
value = 1
comment = "route"

[[sysctl]]
name = "kernel.sysrq"
ensure = "absent"
target = "/etc/sysctl.d/10-sysrq.conf"
"#,
        )
        .unwrap();

        assert_eq!(manifest.settings.drop_in_glob, "/run/sysctl.d/*.conf");
        assert_eq!(manifest.resources.len(), 2);
        assert_eq!(manifest.resources[0].desired_value(), Some("1"));
        assert_eq!(manifest.resources[1].ensure, Ensure::Absent);
        assert_eq!(
            manifest.resources[1].target,
            Some(PathBuf::from("/etc/sysctl.d/10-sysrq.conf"))
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Manifest::parse(
            "[[sysctl]]\nname = \"a.b\"\n[[sysctl]]\nname = \"a.b\"\nvalue = \"1\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sysctl.yaml");
        std::fs::write(
            &path,
            "sysctl:\n  - name: vm.swappiness\n    value: 10\n    apply: false\n",
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.resources[0].desired_value(), Some("10"));
        assert!(!manifest.resources[0].apply);
    }
}

//! Desired state for a single sysctl key

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Desired or observed lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A declared sysctl resource.
///
/// `value` and `val` are aliases; [`Resource::desired_value`] prefers
/// `value`. A `comment` of `None` leaves any existing comment alone, while
/// `Some("")` removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    pub name: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub val: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Config file to write; the layout's legacy file when unset
    #[serde(default)]
    pub target: Option<PathBuf>,

    #[serde(default)]
    pub ensure: Ensure,

    /// Push the value to the running kernel
    #[serde(default = "default_true")]
    pub apply: bool,

    /// Write the value to the config file
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Downgrade unknown-key and rejected-write failures
    #[serde(default)]
    pub silent: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            val: None,
            comment: None,
            target: None,
            ensure: Ensure::Present,
            apply: true,
            persist: true,
            silent: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_val(mut self, val: impl Into<String>) -> Self {
        self.val = Some(val.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn absent(mut self) -> Self {
        self.ensure = Ensure::Absent;
        self
    }

    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Value to enforce, `value` winning over `val`
    pub fn desired_value(&self) -> Option<&str> {
        self.value.as_deref().or(self.val.as_deref())
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Reject malformed declarations before any state is read
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_resource(&self.name, "name must not be empty"));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(Error::invalid_resource(
                &self.name,
                "name must not contain whitespace",
            ));
        }
        if self.name.contains('=') {
            return Err(Error::invalid_resource(&self.name, "name must not contain `=`"));
        }
        // a leading marker would read back as a comment or an ignore-failure entry
        if self.name.starts_with(['-', '#', ';']) {
            return Err(Error::invalid_resource(
                &self.name,
                "name must not start with `-`, `#` or `;`",
            ));
        }
        for (field, text) in [
            ("value", &self.value),
            ("val", &self.val),
            ("comment", &self.comment),
        ] {
            if text.as_deref().is_some_and(|t| t.contains(['\n', '\r'])) {
                return Err(Error::invalid_resource(
                    &self.name,
                    format!("{field} must fit on a single line"),
                ));
            }
        }
        if let (Some(value), Some(val)) = (&self.value, &self.val)
            && value != val
        {
            return Err(Error::invalid_resource(
                &self.name,
                format!("value '{value}' and val '{val}' disagree"),
            ));
        }
        if let Some(target) = &self.target
            && !target.is_absolute()
        {
            return Err(Error::invalid_resource(
                &self.name,
                format!("target {} is not an absolute path", target.display()),
            ));
        }
        Ok(())
    }
}

/// Accept strings and plain scalars, munging everything to a string
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Str(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let resource = Resource::new("net.ipv4.ip_forward");
        assert!(resource.apply);
        assert!(resource.persist);
        assert!(!resource.silent);
        assert_eq!(resource.ensure, Ensure::Present);
        assert_eq!(resource.comment, None);
    }

    #[test]
    fn test_value_wins_over_val() {
        let resource = Resource::new("a.b").with_val("2");
        assert_eq!(resource.desired_value(), Some("2"));
        let resource = resource.with_value("2");
        assert_eq!(resource.desired_value(), Some("2"));
    }

    #[rstest]
    #[case("")]
    #[case("net.ipv4 ip_forward")]
    #[case("net.ipv4.ip_forward=1")]
    #[case("-kernel.sysrq")]
    #[case("#kernel.sysrq")]
    #[case(";kernel.sysrq")]
    fn test_bad_names_rejected(#[case] name: &str) {
        assert!(matches!(
            Resource::new(name).validate(),
            Err(Error::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_inner_dash_allowed() {
        assert!(Resource::new("net.bridge.bridge-nf-call-iptables").validate().is_ok());
    }

    #[rstest]
    #[case(Resource::new("kernel.sysrq").with_value("1\nvm.swappiness = 99"), "value")]
    #[case(Resource::new("kernel.sysrq").with_val("1\r"), "val")]
    #[case(Resource::new("kernel.sysrq").with_comment("a\nb"), "comment")]
    fn test_line_breaks_rejected(#[case] resource: Resource, #[case] field: &str) {
        let err = resource.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidResource { .. }));
        assert!(err.to_string().contains(field), "{err}");
    }

    #[test]
    fn test_disagreeing_aliases_rejected() {
        let resource = Resource::new("a.b").with_value("1").with_val("2");
        assert!(resource.validate().is_err());
    }

    #[test]
    fn test_relative_target_rejected() {
        let resource = Resource::new("a.b").with_target("sysctl.conf");
        assert!(resource.validate().is_err());
    }

    #[test]
    fn test_numbers_munged_to_strings() {
        let resource: Resource =
            toml::from_str("name = \"fs.nr_open\"\nvalue = 1048576\n").unwrap();
        assert_eq!(resource.value.as_deref(), Some("1048576"));

        let resource: Resource =
            serde_json::from_str(r#"{"name": "kernel.sysrq", "val": 0, "apply": false}"#).unwrap();
        assert_eq!(resource.desired_value(), Some("0"));
        assert!(!resource.apply);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let parsed: std::result::Result<Resource, _> =
            toml::from_str("name = \"a.b\"\nvalu = \"1\"\n");
        assert!(parsed.is_err());
    }
}

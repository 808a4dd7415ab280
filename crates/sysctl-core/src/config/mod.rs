//! Engine settings and resource manifests
//!
//! A manifest is a TOML, JSON or YAML file holding an optional `settings`
//! table and a list of `sysctl` resources:
//!
//! ```toml
//! [settings]
//! default_file = "/etc/sysctl.conf"
//! kernel = "linux"
//!
//! [[sysctl]]
//! name = "net.ipv4.ip_forward"
//! value = 1
//! comment = "route between interfaces"
//! ```

mod manifest;
mod settings;

pub use manifest::Manifest;
pub use settings::Settings;

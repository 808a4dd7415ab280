//! Well-known paths for sysctl configuration.

/// Legacy single configuration file, also the default write target.
pub const DEFAULT_FILE: &str = "/etc/sysctl.conf";

/// Drop-in fragments merged by the boot-time loader.
pub const DROP_IN_GLOB: &str = "/etc/sysctl.d/*.conf";

/// Program used for live kernel reads and writes.
pub const DEFAULT_SYSCTL: &str = "sysctl";

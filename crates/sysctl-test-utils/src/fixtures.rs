//! Canned configuration file contents.
//!
//! Modelled on the stock Red Hat `/etc/sysctl.conf`, with a few entries
//! that exercise prefixed comments, commented-out defaults and multi-token
//! values.

/// A populated legacy file.
///
/// Holds nine entries. `accept_source_route` and `kernel.sysrq` carry
/// prefixed comments; `bridge-nf-call-iptables` is commented out between
/// its two siblings; `kernel.sem` is tab separated.
pub const FULL: &str = "\
# Kernel sysctl configuration file for Red Hat Linux

# For binary values, 0 is disabled, 1 is enabled.  See sysctl(8) and
# sysctl.conf(5) for more details.

# Controls IP packet forwarding
net.ipv4.ip_forward = 0

# Controls source route verification
net.ipv4.conf.default.rp_filter = 1

# Do not accept source routing
# net.ipv4.conf.default.accept_source_route: Do not accept source routing
net.ipv4.conf.default.accept_source_route = 0

# SysRq setting
# kernel.sysrq: controls the System Request debugging functionality of the kernel
kernel.sysrq = 0

# Controls whether core dumps will append the PID to the core filename.
# Useful for debugging multi-threaded applications.
kernel.core_uses_pid = 1

# Controls the use of TCP syncookies
net.ipv4.tcp_syncookies = 1

# Disable netfilter on bridges.
net.bridge.bridge-nf-call-ip6tables = 0
# net.bridge.bridge-nf-call-iptables = 0
net.bridge.bridge-nf-call-arptables = 0

# Semaphores
kernel.sem = 250\t32000\t100\t128
";

/// Keys of [`FULL`] in file order
pub const FULL_KEYS: [&str; 9] = [
    "net.ipv4.ip_forward",
    "net.ipv4.conf.default.rp_filter",
    "net.ipv4.conf.default.accept_source_route",
    "kernel.sysrq",
    "kernel.core_uses_pid",
    "net.ipv4.tcp_syncookies",
    "net.bridge.bridge-nf-call-ip6tables",
    "net.bridge.bridge-nf-call-arptables",
    "kernel.sem",
];

/// A single entry under a header
pub const SMALL: &str = "\
# Kernel sysctl configuration file

# For binary values, 0 is disabled, 1 is enabled.  See sysctl(8) and
# sysctl.conf(5) for more details.

# Controls IP packet forwarding
net.ipv4.ip_forward = 0

";

pub const EMPTY: &str = "";

/// Contains lines that are neither comments nor assignments
pub const BROKEN: &str = "\
# Kernel sysctl configuration file
net.ipv4.ip_forward 1
this line is not an assignment
";

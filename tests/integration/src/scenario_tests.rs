//! Cross-crate scenarios: discovery precedence, kernel flavors and
//! formatting preservation on a realistic config file.

use pretty_assertions::assert_eq;
use sysctl_core::{Reconciler, Resource, ResourceStatus};
use sysctl_kernel::{KernelFlavor, LiveKernel};
use sysctl_test_utils::fixtures::{FULL, FULL_KEYS, SMALL};
use sysctl_test_utils::{FakeSysctl, TestLayout};

fn reconciler(tree: &TestLayout, fake: &FakeSysctl, flavor: KernelFlavor) -> Reconciler {
    Reconciler::new(tree.layout(), LiveKernel::new(fake.clone(), flavor))
}

/// Kernel holding every key of [`FULL`] at its file value
fn full_kernel() -> FakeSysctl {
    FakeSysctl::new()
        .with("net.ipv4.ip_forward", "0")
        .with("net.ipv4.conf.default.rp_filter", "1")
        .with("net.ipv4.conf.default.accept_source_route", "0")
        .with("kernel.sysrq", "0")
        .with("kernel.core_uses_pid", "1")
        .with("net.ipv4.tcp_syncookies", "1")
        .with("net.bridge.bridge-nf-call-ip6tables", "0")
        .with("net.bridge.bridge-nf-call-arptables", "0")
        .with("kernel.sem", "250 32000 100 128")
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_latest_drop_in_wins_discovery() {
    let tree = TestLayout::with_default(FULL);
    tree.write_drop_in("10-early.conf", "kernel.sysrq = 1\n");
    let late = tree.write_drop_in(
        "20-late.conf",
        "# kernel.sysrq: magic keys\nkernel.sysrq = 16\n",
    );
    let fake = full_kernel().with("vm.swappiness", "60");

    let aggregate = reconciler(&tree, &fake, KernelFlavor::Linux)
        .instances()
        .unwrap();

    let sysrq = aggregate.get("kernel.sysrq").unwrap();
    assert_eq!(sysrq.value, "16");
    assert_eq!(sysrq.comment.as_deref(), Some("magic keys"));
    assert_eq!(sysrq.target.as_deref(), Some(late.as_path()));
    assert_eq!(sysrq.live_value.as_deref(), Some("0"));

    let names: Vec<&str> = aggregate.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names[0], "kernel.sysrq");
    assert_eq!(names.last(), Some(&"vm.swappiness"));
    assert_eq!(aggregate.len(), FULL_KEYS.len() + 1);
}

#[test]
fn test_discovered_state_reapplies_cleanly() {
    let tree = TestLayout::with_default(FULL);
    let fake = full_kernel();
    let reconciler = reconciler(&tree, &fake, KernelFlavor::Linux);

    let resources: Vec<Resource> = reconciler
        .instances()
        .unwrap()
        .iter()
        .map(|entry| Resource::new(&entry.name).with_value(&entry.value))
        .collect();
    assert_eq!(resources.len(), FULL_KEYS.len());

    let report = reconciler.apply(&resources).unwrap();

    assert!(
        report
            .resources
            .iter()
            .all(|r| r.status == ResourceStatus::Unchanged),
        "{report:?}"
    );
    assert_eq!(tree.read_default(), FULL);
    assert!(fake.writes().is_empty());
}

#[test]
fn test_remove_only_touches_named_target() {
    let tree = TestLayout::with_default(SMALL);
    let drop_in = tree.write_drop_in("10-forward.conf", "net.ipv4.ip_forward = 1\n");
    let fake = FakeSysctl::new().with("net.ipv4.ip_forward", "1");

    let report = reconciler(&tree, &fake, KernelFlavor::Linux)
        .apply(&[Resource::new("net.ipv4.ip_forward")
            .absent()
            .with_target(&drop_in)])
        .unwrap();

    assert_eq!(report.resources[0].events, ["removed"]);
    assert_eq!(tree.read(&drop_in), "");
    assert_eq!(tree.read_default(), SMALL);
    assert!(fake.writes().is_empty());
}

// =============================================================================
// Kernel flavors
// =============================================================================

#[test]
fn test_freebsd_flags() {
    let tree = TestLayout::with_default("kern.maxfiles = 1000\n");
    let fake = FakeSysctl::new().with("kern.maxfiles", "1000");

    let report = reconciler(&tree, &fake, KernelFlavor::FreeBsd)
        .apply(&[Resource::new("kern.maxfiles").with_value("2000")])
        .unwrap();

    assert!(report.success());
    let calls = fake.calls();
    assert_eq!(calls[0], ["-ieW", "kern.maxfiles"]);
    assert!(calls.contains(&vec!["-w".to_string(), "kern.maxfiles=2000".to_string()]));
    assert_eq!(tree.read_default(), "kern.maxfiles = 2000\n");
}

#[test]
fn test_openbsd_bare_arguments() {
    let tree = TestLayout::with_default("kern.maxfiles = 1000\n");
    let fake = FakeSysctl::new().with("kern.maxfiles", "1000");

    reconciler(&tree, &fake, KernelFlavor::OpenBsd)
        .apply(&[Resource::new("kern.maxfiles").with_value("2000")])
        .unwrap();

    let calls = fake.calls();
    assert_eq!(calls[0], ["kern.maxfiles"]);
    assert!(calls.contains(&vec!["kern.maxfiles=2000".to_string()]));
    assert_eq!(fake.value("kern.maxfiles").as_deref(), Some("2000"));
}

#[test]
fn test_openbsd_full_dump() {
    let tree = TestLayout::new();
    let fake = FakeSysctl::new().with("kern.ostype", "OpenBSD");

    let aggregate = reconciler(&tree, &fake, KernelFlavor::OpenBsd)
        .instances()
        .unwrap();

    assert_eq!(fake.calls(), [vec!["-a".to_string()]]);
    assert_eq!(aggregate.get("kern.ostype").unwrap().value, "OpenBSD");
}

// =============================================================================
// Formatting preservation
// =============================================================================

#[test]
fn test_single_edit_preserves_rest_of_file() {
    let tree = TestLayout::with_default(FULL);
    let fake = full_kernel();

    let report = reconciler(&tree, &fake, KernelFlavor::Linux)
        .apply(&[Resource::new("kernel.sem")
            .with_value("150 12000 12 1000")
            .with_apply(false)])
        .unwrap();

    assert_eq!(
        report.resources[0].events,
        ["changed configuration value from '250\t32000\t100\t128' to '150 12000 12 1000'"]
    );
    assert_eq!(
        tree.read_default(),
        FULL.replace("kernel.sem = 250\t32000\t100\t128", "kernel.sem = 150 12000 12 1000")
    );
    assert!(fake.writes().is_empty());
}

//! End-to-end integration test for the manifest pipeline
//!
//! Exercises the complete flow: manifest loading -> prefetch -> resolve ->
//! flush, with the kernel faked behind the runner seam.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sysctl_core::{Manifest, Reconciler, ResourceStatus, Settings};
use sysctl_kernel::LiveKernel;
use sysctl_test_utils::fixtures::SMALL;
use sysctl_test_utils::{FakeSysctl, TestLayout};

/// Reconciler honouring a manifest's settings, but with a fake kernel
fn reconciler(settings: &Settings, fake: &FakeSysctl) -> Reconciler {
    Reconciler::new(
        settings.layout(),
        LiveKernel::new(fake.clone(), settings.flavor()).with_chunk_size(settings.chunk_size),
    )
}

/// Write a manifest pointing at the test tree
fn write_manifest(tree: &TestLayout, name: &str, body: &str) -> PathBuf {
    let path = tree.root().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn settings_toml(tree: &TestLayout) -> String {
    format!(
        "[settings]\ndefault_file = \"{}\"\ndrop_in_glob = \"{}\"\nkernel = \"linux\"\n",
        tree.default_file().display(),
        tree.layout().drop_in_glob()
    )
}

#[test]
fn test_toml_manifest_end_to_end() {
    let tree = TestLayout::with_default(SMALL);
    let drop_in = tree.drop_in_dir().join("50-vm.conf");
    let fake = FakeSysctl::new()
        .with("net.ipv4.ip_forward", "0")
        .with("vm.swappiness", "60")
        .with("kernel.sysrq", "16");

    let body = format!(
        r#"{settings}
[[sysctl]]
name = "net.ipv4.ip_forward"
value = 1
comment = "route between interfaces"

[[sysctl]]
name = "vm.swappiness"
val = "10"
target = "{drop_in}"

[[sysctl]]
name = "kernel.sysrq"
value = "16"
persist = false
"#,
        settings = settings_toml(&tree),
        drop_in = drop_in.display(),
    );
    let manifest = Manifest::load(&write_manifest(&tree, "site.toml", &body)).unwrap();

    let report = reconciler(&manifest.settings, &fake)
        .apply(&manifest.resources)
        .unwrap();

    assert!(report.success());
    assert_eq!(
        report.resource("net.ipv4.ip_forward").unwrap().events,
        [
            "changed configuration value from '0' to '1' and live value from '0' to '1'",
            "defined 'comment' as 'route between interfaces'",
        ]
    );
    assert_eq!(
        report.resource("kernel.sysrq").unwrap().status,
        ResourceStatus::Unchanged
    );

    assert_eq!(
        tree.read_default(),
        SMALL.replace(
            "net.ipv4.ip_forward = 0",
            "# net.ipv4.ip_forward: route between interfaces\nnet.ipv4.ip_forward = 1"
        )
    );
    assert_eq!(tree.read(&drop_in), "vm.swappiness = 10\n");
    assert_eq!(fake.value("net.ipv4.ip_forward").as_deref(), Some("1"));
    assert_eq!(fake.value("vm.swappiness").as_deref(), Some("10"));
}

#[test]
fn test_json_and_yaml_manifests_agree() {
    let tree = TestLayout::with_default(SMALL);
    let default_file = tree.default_file();
    let json = write_manifest(
        &tree,
        "site.json",
        &format!(
            r#"{{"settings": {{"default_file": {path:?}, "kernel": "linux"}},
                "sysctl": [{{"name": "net.ipv4.ip_forward", "value": 1, "apply": false}}]}}"#,
            path = default_file.display().to_string()
        ),
    );
    let yaml = write_manifest(
        &tree,
        "site.yaml",
        &format!(
            "settings:\n  default_file: {path}\n  kernel: linux\nsysctl:\n  - name: net.ipv4.ip_forward\n    value: 1\n    apply: false\n",
            path = default_file.display()
        ),
    );

    let from_json = Manifest::load(&json).unwrap();
    let from_yaml = Manifest::load(&yaml).unwrap();

    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json.resources[0].desired_value(), Some("1"));
}

#[test]
fn test_check_then_apply_produce_same_events() {
    let tree = TestLayout::with_default(SMALL);
    let fake = FakeSysctl::new().with("net.ipv4.ip_forward", "0");
    let body = format!(
        "{}\n[[sysctl]]\nname = \"net.ipv4.ip_forward\"\nvalue = \"1\"\n",
        settings_toml(&tree)
    );
    let manifest = Manifest::load(&write_manifest(&tree, "site.toml", &body)).unwrap();
    let reconciler = reconciler(&manifest.settings, &fake);

    let check = reconciler.check(&manifest.resources).unwrap();
    assert!(check.noop);
    assert_eq!(tree.read_default(), SMALL);
    assert!(fake.writes().is_empty());

    let apply = reconciler.apply(&manifest.resources).unwrap();
    assert_eq!(check.resources[0].events, apply.resources[0].events);
    assert_eq!(apply.resources[0].diff, None);
    assert!(tree.read_default().contains("net.ipv4.ip_forward = 1"));
}

#[test]
fn test_report_serializes_for_machines() {
    let tree = TestLayout::with_default(SMALL);
    let fake = FakeSysctl::new().with("net.ipv4.ip_forward", "0");
    let body = format!(
        "{}\n[[sysctl]]\nname = \"fs.this_cannot_exist\"\nvalue = 1\n",
        settings_toml(&tree)
    );
    let manifest = Manifest::load(&write_manifest(&tree, "site.toml", &body)).unwrap();

    let report = reconciler(&manifest.settings, &fake)
        .apply(&manifest.resources)
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "noop": false,
            "resources": [{
                "name": "fs.this_cannot_exist",
                "status": "failed",
                "events": [],
                "error": "`fs.this_cannot_exist` is not a valid sysctl key",
            }],
        })
    );
    assert_eq!(tree.read_default(), SMALL);
    assert!(fake.writes().is_empty());
}

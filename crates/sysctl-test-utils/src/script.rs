//! A `sysctl` stand-in executable for binary tests.
//!
//! Realism level: **PROCESS**: a real child process speaking the Linux
//! argument forms, backed by a `state` file of `key=value` lines next to
//! the script. Every invocation is appended to a `calls` file.

use std::fs;
use std::path::{Path, PathBuf};

const SCRIPT: &str = r#"#!/bin/sh
dir=$(dirname "$0")
state="$dir/state"
echo "$*" >> "$dir/calls"

lookup() {
    grep -F -- "$1=" "$state" | while IFS= read -r line; do
        case "$line" in "$1="*) echo "${line#*=}"; break ;; esac
    done
}

case "$1" in
    -a)
        sed 's/=/ = /' "$state"
        ;;
    -n)
        value=$(lookup "$2")
        if [ -z "$value" ] && ! grep -q -F -- "$2=" "$state"; then
            echo "sysctl: cannot stat /proc/sys/$2: No such file or directory" >&2
            exit 255
        fi
        echo "$value"
        ;;
    -w)
        key=${2%%=*}
        if ! grep -q -F -- "$key=" "$state"; then
            echo "sysctl: cannot stat /proc/sys/$key: No such file or directory" >&2
            exit 255
        fi
        grep -v -F -- "$key=" "$state" > "$state.tmp"
        echo "$2" >> "$state.tmp"
        mv "$state.tmp" "$state"
        echo "$key = ${2#*=}"
        ;;
    -e)
        shift
        for key in "$@"; do
            if grep -q -F -- "$key=" "$state"; then
                echo "$key = $(lookup "$key")"
            fi
        done
        ;;
esac
"#;

/// Install the fake into `dir` with the given live values.
///
/// Returns the path of the executable.
///
/// # Panics
/// Panics if the files cannot be written.
pub fn install_fake_sysctl(dir: &Path, values: &[(&str, &str)]) -> PathBuf {
    let state: String = values.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    fs::write(dir.join("state"), state)
        .unwrap_or_else(|e| panic!("install_fake_sysctl: failed to write state: {e}"));

    let path = dir.join("sysctl");
    fs::write(&path, SCRIPT)
        .unwrap_or_else(|e| panic!("install_fake_sysctl: failed to write script: {e}"));
    make_executable(&path);
    path
}

/// Live value recorded by the fake in `dir`
pub fn fake_sysctl_value(dir: &Path, key: &str) -> Option<String> {
    let state = fs::read_to_string(dir.join("state")).ok()?;
    state.lines().find_map(|line| {
        line.split_once('=')
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

/// Argument lines the fake in `dir` was invoked with
pub fn fake_sysctl_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls"))
        .map(|calls| calls.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("install_fake_sysctl: chmod failed: {e}"));
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

//! In-memory kernel implementing [`SysctlRunner`]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use sysctl_kernel::{KernelError, SysctlRunner};

#[derive(Debug, Default)]
struct State {
    values: BTreeMap<String, String>,
    read_only: BTreeSet<String>,
    calls: Vec<Vec<String>>,
}

/// A fake `sysctl` that understands every flavor's argument forms.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect recorded invocations through another.
///
/// Unknown keys are skipped by existence-checked queries, fail `-n` reads
/// and fail writes, mirroring the real command. Keys marked read-only fail
/// writes as well.
#[derive(Debug, Clone, Default)]
pub struct FakeSysctl {
    state: Arc<Mutex<State>>,
}

impl FakeSysctl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeSysctl::insert`]
    pub fn with(self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or overwrite a live key
    pub fn insert(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    /// Make writes to `key` fail
    pub fn read_only(self, key: &str) -> Self {
        self.lock().read_only.insert(key.to_string());
        self
    }

    /// Current live value of `key`
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Every invocation so far, oldest first
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.lock().calls.clone()
    }

    /// Invocations that attempted a write, as `(key, value)` pairs
    pub fn writes(&self) -> Vec<(String, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|args| write_assignment(args))
            .filter_map(|a| a.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn write_assignment(args: &[String]) -> Option<&str> {
    match args {
        [flag, assignment] if flag == "-w" => Some(assignment.as_str()),
        [assignment] if assignment.contains('=') => Some(assignment.as_str()),
        _ => None,
    }
}

fn failure(args: &[String], message: String) -> KernelError {
    KernelError::ExecutionFailed {
        command: format!("sysctl {}", args.join(" ")),
        code: 255,
        stderr: message,
    }
}

impl SysctlRunner for FakeSysctl {
    fn run(&self, args: &[String]) -> sysctl_kernel::Result<String> {
        let mut state = self.lock();
        state.calls.push(args.to_vec());

        if let Some(assignment) = write_assignment(args) {
            let Some((key, value)) = assignment.split_once('=') else {
                return Err(failure(args, format!("malformed assignment {assignment}")));
            };
            if !state.values.contains_key(key) {
                return Err(failure(args, format!("cannot stat /proc/sys/{key}")));
            }
            if state.read_only.contains(key) {
                return Err(failure(args, format!("permission denied on key '{key}'")));
            }
            state.values.insert(key.to_string(), value.to_string());
            return Ok(format!("{key} = {value}\n"));
        }

        match args.first().map(String::as_str) {
            Some("-a" | "-aeW") if args.len() == 1 => Ok(state
                .values
                .iter()
                .map(|(k, v)| format!("{k} = {v}\n"))
                .collect()),
            Some("-n") => {
                let key = args.get(1).map(String::as_str).unwrap_or_default();
                state
                    .values
                    .get(key)
                    .map(|v| format!("{v}\n"))
                    .ok_or_else(|| failure(args, format!("cannot stat /proc/sys/{key}")))
            }
            Some(first) => {
                let keys = if first == "-e" || first == "-ieW" {
                    &args[1..]
                } else {
                    args
                };
                Ok(keys
                    .iter()
                    .filter_map(|k| state.values.get(k).map(|v| format!("{k} = {v}\n")))
                    .collect())
            }
            None => Ok(String::new()),
        }
    }
}

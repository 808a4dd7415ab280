//! Live-state reads and writes against the running kernel

use crate::error::{KernelError, Result};
use crate::flavor::KernelFlavor;
use crate::runner::SysctlRunner;

/// Keys per existence-checked query; keeps each command line well under
/// argument-length limits.
pub const DEFAULT_CHUNK_SIZE: usize = 30;

/// Reader and writer for live kernel parameters
pub struct LiveKernel {
    runner: Box<dyn SysctlRunner>,
    flavor: KernelFlavor,
    chunk_size: usize,
}

impl LiveKernel {
    pub fn new(runner: impl SysctlRunner + 'static, flavor: KernelFlavor) -> Self {
        Self {
            runner: Box::new(runner),
            flavor,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the number of keys per batched query (minimum 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn flavor(&self) -> KernelFlavor {
        self.flavor
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Dump every key the kernel knows about
    pub fn read_all(&self) -> Result<Vec<(String, String)>> {
        let output = self.runner.run(&self.flavor.read_all_args())?;
        let values = parse_output(&output);
        tracing::debug!(count = values.len(), "read all live values");
        Ok(values)
    }

    /// Query a known set of keys.
    ///
    /// Keys the kernel does not recognise are simply missing from the
    /// result. Queries are issued in chunks and their outputs concatenated
    /// before parsing.
    pub fn read_some(&self, keys: &[String]) -> Result<Vec<(String, String)>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut output = String::new();
        for chunk in keys.chunks(self.chunk_size) {
            let mut args = self.flavor.read_some_args();
            args.extend(chunk.iter().cloned());
            let chunk_output = self.runner.run(&args)?;
            output.push_str(&chunk_output);
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
        }

        let values = parse_output(&output);
        tracing::debug!(
            requested = keys.len(),
            found = values.len(),
            chunks = keys.len().div_ceil(self.chunk_size),
            "read live values"
        );
        Ok(values)
    }

    /// Read one key's current value.
    ///
    /// Fails with [`KernelError::ExecutionFailed`] when the key is unknown.
    pub fn get(&self, key: &str) -> Result<String> {
        let output = self.runner.run(&self.flavor.get_args(key))?;
        Ok(scrub(output.trim_end_matches(['\n', '\r'])))
    }

    /// Write one key.
    ///
    /// With `silent` set, a rejected write is logged at debug level and
    /// reported as success.
    pub fn set(&self, key: &str, value: &str, silent: bool) -> Result<()> {
        match self.runner.run(&self.flavor.set_args(key, value)) {
            Ok(_) => {
                tracing::debug!(key, value, "set live value");
                Ok(())
            }
            Err(e @ KernelError::ExecutionFailed { .. }) if silent => {
                tracing::debug!(key, error = %e, "ignoring failed attempt to set key due to silent mode");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for LiveKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveKernel")
            .field("flavor", &self.flavor)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

/// Parse `key = value` lines, splitting on the first `=`.
///
/// Output is scrubbed to ASCII first. Lines without a separator or with an
/// empty key are skipped.
pub fn parse_output(output: &str) -> Vec<(String, String)> {
    let mut values = Vec::new();
    for line in output.lines() {
        let line = scrub(line);
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(line = %line, "skipping sysctl output line without `=`");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            tracing::warn!(line = %line, "skipping sysctl output line without key");
            continue;
        }
        values.push((key.to_string(), value.trim().to_string()));
    }
    values
}

fn scrub(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Canned responses keyed by the full argument line
    #[derive(Clone, Default)]
    struct Scripted {
        responses: HashMap<String, std::result::Result<String, i32>>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl Scripted {
        fn respond(mut self, args: &str, out: &str) -> Self {
            self.responses.insert(args.to_string(), Ok(out.to_string()));
            self
        }

        fn fail(mut self, args: &str, code: i32) -> Self {
            self.responses.insert(args.to_string(), Err(code));
            self
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SysctlRunner for Scripted {
        fn run(&self, args: &[String]) -> Result<String> {
            self.calls.lock().unwrap().push(args.to_vec());
            let line = args.join(" ");
            match self.responses.get(&line) {
                Some(Ok(out)) => Ok(out.clone()),
                Some(Err(code)) => Err(KernelError::ExecutionFailed {
                    command: format!("sysctl {line}"),
                    code: *code,
                    stderr: "rejected".into(),
                }),
                None => Ok(String::new()),
            }
        }
    }

    #[test]
    fn test_parse_output_splits_on_first_equals() {
        let parsed = parse_output("kernel.core_pattern = |/usr/bin/x a=b\nkernel.sem = 100   13000 11  1200\n\n");
        assert_eq!(
            parsed,
            vec![
                ("kernel.core_pattern".to_string(), "|/usr/bin/x a=b".to_string()),
                ("kernel.sem".to_string(), "100   13000 11  1200".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_output_scrubs_non_ascii_and_skips_junk() {
        let parsed = parse_output("dev.cdrom.info = CD-ROM\u{fffd} info\nno separator here\n= orphan\n");
        assert_eq!(
            parsed,
            vec![("dev.cdrom.info".to_string(), "CD-ROM info".to_string())]
        );
    }

    #[test]
    fn test_read_all_uses_flavor_args() {
        let runner = Scripted::default().respond("-aeW", "kern.ostype=FreeBSD\n");
        let kernel = LiveKernel::new(runner.clone(), KernelFlavor::FreeBsd);

        let values = kernel.read_all().unwrap();

        assert_eq!(values, vec![("kern.ostype".to_string(), "FreeBSD".to_string())]);
        assert_eq!(runner.calls(), vec![vec!["-aeW".to_string()]]);
    }

    #[test]
    fn test_read_some_chunks_keys() {
        let keys: Vec<String> = (0..65).map(|i| format!("k.{i}")).collect();
        let mut runner = Scripted::default();
        for chunk in keys.chunks(30) {
            let line = format!("-e {}", chunk.join(" "));
            // last line of each chunk deliberately lacks a trailing newline
            let out = chunk
                .iter()
                .map(|k| format!("{k} = v"))
                .collect::<Vec<_>>()
                .join("\n");
            runner = runner.respond(&line, &out);
        }
        let kernel = LiveKernel::new(runner.clone(), KernelFlavor::Linux);

        let values = kernel.read_some(&keys).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].len(), 31);
        assert_eq!(calls[2].len(), 6);
        assert_eq!(values.len(), 65);
        let found: Vec<&str> = values.iter().map(|(k, _)| k.as_str()).collect();
        let expected: Vec<&str> = keys.iter().map(String::as_str).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_read_some_empty_issues_no_command() {
        let runner = Scripted::default();
        let kernel = LiveKernel::new(runner.clone(), KernelFlavor::Linux);
        assert!(kernel.read_some(&[]).unwrap().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_read_some_openbsd_has_no_flag() {
        let runner = Scripted::default().respond("kern.maxfiles", "kern.maxfiles=7030\n");
        let kernel = LiveKernel::new(runner.clone(), KernelFlavor::OpenBsd);

        let values = kernel.read_some(&["kern.maxfiles".to_string()]).unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(runner.calls(), vec![vec!["kern.maxfiles".to_string()]]);
    }

    #[test]
    fn test_get_chomps_newline() {
        let runner = Scripted::default().respond("-n kernel.sem", "150\t12000\t12\t1000\n");
        let kernel = LiveKernel::new(runner, KernelFlavor::Linux);
        assert_eq!(kernel.get("kernel.sem").unwrap(), "150\t12000\t12\t1000");
    }

    #[test]
    fn test_get_unknown_key_fails() {
        let runner = Scripted::default().fail("-n fs.nope", 255);
        let kernel = LiveKernel::new(runner, KernelFlavor::Linux);
        assert!(kernel.get("fs.nope").unwrap_err().is_execution_failure());
    }

    #[test]
    fn test_set_failure_propagates_unless_silent() {
        let runner = Scripted::default().fail("-w fs.nope=1", 255);
        let kernel = LiveKernel::new(runner.clone(), KernelFlavor::Linux);

        assert!(kernel.set("fs.nope", "1", false).is_err());
        assert!(kernel.set("fs.nope", "1", true).is_ok());
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_chunk_size_floor() {
        let kernel = LiveKernel::new(Scripted::default(), KernelFlavor::Linux).with_chunk_size(0);
        assert_eq!(kernel.chunk_size(), 1);
    }
}

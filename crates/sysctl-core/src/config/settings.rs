//! Engine settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sysctl_fs::{ConfigLayout, DEFAULT_FILE, DEFAULT_SYSCTL, DROP_IN_GLOB};
use sysctl_kernel::{DEFAULT_CHUNK_SIZE, KernelFlavor, LiveKernel, SystemSysctl};

/// Where to find config files and how to reach the kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Legacy config file and default write target
    pub default_file: PathBuf,
    /// Glob matching drop-in fragments
    pub drop_in_glob: String,
    /// The `sysctl` program
    pub sysctl_path: PathBuf,
    /// Flavor override; detected from the build target when unset
    pub kernel: Option<KernelFlavor>,
    /// Keys per batched live query
    pub chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from(DEFAULT_FILE),
            drop_in_glob: DROP_IN_GLOB.to_string(),
            sysctl_path: PathBuf::from(DEFAULT_SYSCTL),
            kernel: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Settings {
    pub fn layout(&self) -> ConfigLayout {
        ConfigLayout::new(&self.default_file, &self.drop_in_glob)
    }

    pub fn flavor(&self) -> KernelFlavor {
        self.kernel.unwrap_or_else(KernelFlavor::detect)
    }

    /// Live kernel backed by the real `sysctl` program
    pub fn live_kernel(&self) -> LiveKernel {
        LiveKernel::new(SystemSysctl::new(&self.sysctl_path), self.flavor())
            .with_chunk_size(self.chunk_size)
    }
}

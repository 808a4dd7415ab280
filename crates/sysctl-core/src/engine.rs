//! Batch reconciler
//!
//! Prefetches the aggregate once per batch, then resolves and flushes each
//! resource independently. A failing resource is reported and the batch
//! moves on.

use sysctl_fs::ConfigLayout;
use sysctl_kernel::LiveKernel;

use crate::Result;
use crate::config::Settings;
use crate::entry::Aggregate;
use crate::prefetch::prefetch;
use crate::provider::{Provider, SysctlProvider};
use crate::report::{ApplyReport, ResourceReport};
use crate::resolve::resolve;
use crate::resource::Resource;

/// Reconciles sysctl resources against config files and the live kernel
#[derive(Debug)]
pub struct Reconciler {
    layout: ConfigLayout,
    kernel: LiveKernel,
}

impl Reconciler {
    pub fn new(layout: ConfigLayout, kernel: LiveKernel) -> Self {
        Self { layout, kernel }
    }

    /// Reconciler using the real `sysctl` program
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.layout(), settings.live_kernel())
    }

    pub fn layout(&self) -> &ConfigLayout {
        &self.layout
    }

    pub fn kernel(&self) -> &LiveKernel {
        &self.kernel
    }

    /// Every key found in any config file or in the running kernel
    pub fn instances(&self) -> Result<Aggregate> {
        prefetch(&self.layout, &self.kernel, None)
    }

    /// Aggregate scoped to `resources`
    pub fn prefetch(&self, resources: &[Resource]) -> Result<Aggregate> {
        prefetch(&self.layout, &self.kernel, Some(resources))
    }

    /// Converge every resource.
    ///
    /// Only a prefetch failure (such as an unparsable target) aborts the
    /// batch; per-resource failures land in the report.
    pub fn apply(&self, resources: &[Resource]) -> Result<ApplyReport> {
        self.run(resources, false)
    }

    /// Report what [`Reconciler::apply`] would change without writing
    /// anything. Live values are still read.
    pub fn check(&self, resources: &[Resource]) -> Result<ApplyReport> {
        self.run(resources, true)
    }

    fn run(&self, resources: &[Resource], noop: bool) -> Result<ApplyReport> {
        let mut report = ApplyReport::new(noop);

        let valid: Vec<Resource> = resources
            .iter()
            .filter(|r| r.validate().is_ok())
            .cloned()
            .collect();
        let aggregate = self.prefetch(&valid)?;

        for resource in resources {
            let outcome = resource
                .validate()
                .and_then(|()| self.reconcile(resource, &aggregate, noop));
            match outcome {
                Ok(resource_report) => report.push(resource_report),
                Err(e) => {
                    tracing::warn!(key = %resource.name, error = %e, "failed to reconcile");
                    report.push(ResourceReport::failed(&resource.name, e.to_string()));
                }
            }
        }

        tracing::debug!(
            resources = report.resources.len(),
            changed = report.changed().count(),
            failed = report.failed().count(),
            noop,
            "reconciliation finished"
        );
        Ok(report)
    }

    fn reconcile(
        &self,
        resource: &Resource,
        aggregate: &Aggregate,
        noop: bool,
    ) -> Result<ResourceReport> {
        let target = self.layout.resolve_target(resource.target());
        let mut provider = SysctlProvider::new(
            resource,
            aggregate.get(&resource.name),
            target,
            &self.kernel,
        );

        let events = resolve(&mut provider, resource)?;
        if events.is_empty() {
            return Ok(ResourceReport::unchanged(&resource.name));
        }

        let messages: Vec<String> = events.iter().map(ToString::to_string).collect();
        for message in &messages {
            tracing::info!(key = %resource.name, target = %provider.target().display(), noop, "{message}");
        }

        if noop {
            let diff = provider.preview()?;
            return Ok(ResourceReport::changed(&resource.name, messages).with_diff(diff));
        }

        provider.flush()?;
        Ok(ResourceReport::changed(&resource.name, messages))
    }
}

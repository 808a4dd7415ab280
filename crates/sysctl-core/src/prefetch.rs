//! State merger: builds the batch aggregate from files and the kernel

use std::path::PathBuf;

use sysctl_fs::ConfigLayout;
use sysctl_kernel::LiveKernel;

use crate::Result;
use crate::entry::Aggregate;
use crate::resource::Resource;
use crate::scan;

/// Build the aggregate for a batch.
///
/// With reference resources, only their effective targets are scanned and
/// only their names are queried live. Without, every file on the search
/// path is scanned and the whole kernel is dumped.
pub fn prefetch(
    layout: &ConfigLayout,
    kernel: &LiveKernel,
    reference: Option<&[Resource]>,
) -> Result<Aggregate> {
    let mut aggregate = Aggregate::new();

    let live = match reference {
        Some(resources) => {
            for (target, names) in group_by_target(layout, resources) {
                scan::collect(&target, names.as_slice(), &mut aggregate)?;
            }
            let mut names: Vec<String> = Vec::with_capacity(resources.len());
            for resource in resources {
                if !names.contains(&resource.name) {
                    names.push(resource.name.clone());
                }
            }
            kernel.read_some(&names)?
        }
        None => {
            scan::discover_all(layout, &mut aggregate)?;
            kernel.read_all()?
        }
    };

    for (name, value) in &live {
        aggregate.merge_live(name, value);
    }

    tracing::debug!(
        entries = aggregate.len(),
        live = live.len(),
        scoped = reference.is_some(),
        "prefetched aggregate"
    );
    Ok(aggregate)
}

/// Resource names per effective target, targets in first-seen order
fn group_by_target<'a>(
    layout: &ConfigLayout,
    resources: &'a [Resource],
) -> Vec<(PathBuf, Vec<&'a str>)> {
    let mut groups: Vec<(PathBuf, Vec<&'a str>)> = Vec::new();
    for resource in resources {
        let target = layout.resolve_target(resource.target());
        match groups.iter_mut().find(|(t, _)| *t == target) {
            Some((_, names)) => names.push(&resource.name),
            None => groups.push((target, vec![&resource.name])),
        }
    }
    groups
}

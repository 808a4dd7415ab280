//! Reconciliation reports

use serde::{Deserialize, Serialize};

/// Outcome for a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Already in the desired state
    Unchanged,
    /// Changes were applied, or would be in a noop run
    Changed,
    /// Reconciliation failed; other resources were unaffected
    Failed,
}

/// Report for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReport {
    pub name: String,
    pub status: ResourceStatus,
    /// Human-readable change messages, in the order they were detected
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unified diff of the target file, noop runs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl ResourceReport {
    pub fn unchanged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ResourceStatus::Unchanged,
            events: Vec::new(),
            error: None,
            diff: None,
        }
    }

    pub fn changed(name: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            name: name.into(),
            status: ResourceStatus::Changed,
            events,
            error: None,
            diff: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ResourceStatus::Failed,
            events: Vec::new(),
            error: Some(error.into()),
            diff: None,
        }
    }

    /// Attach a diff, ignoring empty ones
    pub fn with_diff(mut self, diff: String) -> Self {
        if !diff.is_empty() {
            self.diff = Some(diff);
        }
        self
    }
}

/// Report from an apply or check run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// True for check runs, where nothing was written
    pub noop: bool,
    pub resources: Vec<ResourceReport>,
}

impl ApplyReport {
    pub fn new(noop: bool) -> Self {
        Self {
            noop,
            resources: Vec::new(),
        }
    }

    pub fn push(&mut self, report: ResourceReport) {
        self.resources.push(report);
    }

    /// False when any resource failed
    pub fn success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn changed(&self) -> impl Iterator<Item = &ResourceReport> {
        self.with_status(ResourceStatus::Changed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ResourceReport> {
        self.with_status(ResourceStatus::Failed)
    }

    /// Report for `name`, if it was part of the run
    pub fn resource(&self, name: &str) -> Option<&ResourceReport> {
        self.resources.iter().find(|r| r.name == name)
    }

    fn with_status(&self, status: ResourceStatus) -> impl Iterator<Item = &ResourceReport> {
        self.resources.iter().filter(move |r| r.status == status)
    }
}

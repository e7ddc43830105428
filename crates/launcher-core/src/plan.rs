//! The installation plan: the concrete output handed to the framework
//! launcher.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};

/// A configuration record in the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfiguration {
    /// Pid for singletons, instance name for factory configurations.
    pub name: String,
    /// Set only for factory configurations.
    pub factory_pid: Option<String>,
    pub properties: Map<String, Value>,
}

/// Everything the launcher needs to boot the framework: bundle files
/// grouped by start order, additional installable artifacts,
/// configuration records, and merged framework properties.
#[derive(Debug, Clone, Default)]
pub struct InstallationPlan {
    bundle_map: BTreeMap<u32, Vec<PathBuf>>,
    installable_artifacts: Vec<PathBuf>,
    configurations: Vec<PlanConfiguration>,
    framework_properties: Map<String, Value>,
}

impl InstallationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bundle file at the given start order. Files accumulate in
    /// the order they are added; nothing is deduplicated.
    pub fn add_bundle(&mut self, start_order: u32, file: PathBuf) {
        self.bundle_map.entry(start_order).or_default().push(file);
    }

    /// Append a non-bundle artifact file to the install list.
    pub fn add_installable_artifact(&mut self, file: PathBuf) {
        self.installable_artifacts.push(file);
    }

    /// Append a configuration record.
    pub fn add_configuration(
        &mut self,
        name: impl Into<String>,
        factory_pid: Option<String>,
        properties: Map<String, Value>,
    ) {
        self.configurations.push(PlanConfiguration {
            name: name.into(),
            factory_pid,
            properties,
        });
    }

    /// Set a framework property unless one with the same name is already
    /// present. Returns whether the value was stored (first writer wins).
    pub fn set_framework_property(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if self.framework_properties.contains_key(&name) {
            return false;
        }
        self.framework_properties.insert(name, value);
        true
    }

    /// Bundle files grouped by ascending start order.
    pub fn bundle_map(&self) -> &BTreeMap<u32, Vec<PathBuf>> {
        &self.bundle_map
    }

    /// Total number of bundle files across all start orders.
    pub fn bundle_count(&self) -> usize {
        self.bundle_map.values().map(Vec::len).sum()
    }

    pub fn installable_artifacts(&self) -> &[PathBuf] {
        &self.installable_artifacts
    }

    pub fn configurations(&self) -> &[PlanConfiguration] {
        &self.configurations
    }

    pub fn framework_properties(&self) -> &Map<String, Value> {
        &self.framework_properties
    }
}

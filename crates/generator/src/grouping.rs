//! Grouping of resolved operations into output modules

use collection_generator_common::{GroupingPolicy, ResolvedOperation};
use std::collections::BTreeMap;

/// Operations emitted into one module file
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGroup {
    pub vendor: String,
    pub app: String,
    pub module_name: String,
    pub grouping: GroupingPolicy,
    /// Entry points of the module, sorted by entry point name
    pub members: Vec<ResolvedOperation>,
}

impl ModuleGroup {
    /// Resource the module was derived from (first member's)
    pub fn resource(&self) -> &str {
        self.members
            .first()
            .map(|m| m.operation().resource.as_str())
            .unwrap_or(&self.module_name)
    }

    pub fn entry_points(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.entry_point.as_str())
    }

    /// Whether the module dispatches between several entry points via `state`
    ///
    /// A resource with a single action is called directly.
    pub fn has_state(&self) -> bool {
        self.grouping == GroupingPolicy::PerResource && self.members.len() > 1
    }
}

/// Group resolved operations by module name
///
/// Groups come out sorted by module name and members sorted by entry point,
/// whatever the input order.
pub fn group_operations(
    operations: Vec<ResolvedOperation>,
    grouping: GroupingPolicy,
) -> Vec<ModuleGroup> {
    let mut groups: BTreeMap<String, ModuleGroup> = BTreeMap::new();

    for resolved in operations {
        let group = groups
            .entry(resolved.module_name.clone())
            .or_insert_with(|| ModuleGroup {
                vendor: resolved.operation().vendor.clone(),
                app: resolved.operation().app.clone(),
                module_name: resolved.module_name.clone(),
                grouping,
                members: Vec::new(),
            });
        group.members.push(resolved);
    }

    groups
        .into_values()
        .map(|mut group| {
            group
                .members
                .sort_by(|a, b| a.entry_point.cmp(&b.entry_point));
            group
        })
        .collect()
}

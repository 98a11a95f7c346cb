//! Machine-readable module metadata
//!
//! The JSON written next to every module is a stable contract for the
//! documentation extractor. Options are merged across the entry points of a
//! module and sorted by name, so the output only depends on the operations.

use crate::grouping::ModuleGroup;
use collection_generator_common::{
    EmissionError, GeneratorConfig, GroupingPolicy, HttpAction, MappedType, Parameter,
    ParameterLocation,
};
use collection_generator_parser::STATE_ARGUMENT;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Version of the metadata format
pub const METADATA_VERSION: u32 = 1;

/// Metadata of one emitted module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub metadata_version: u32,
    pub module: String,
    pub vendor: String,
    pub app: String,
    pub layout_version: u32,
    pub grouping: GroupingPolicy,
    pub short_description: String,
    pub description: Vec<String>,
    pub entry_points: Vec<EntryPointSpec>,
    pub options: Vec<OptionSpec>,
    /// Response tree per entry point
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub returns: BTreeMap<String, ReturnSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPointSpec {
    pub name: String,
    pub action: HttpAction,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

/// One documented module option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    /// Request location; absent for nested options and mixed locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterLocation>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_log: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suboptions: Vec<OptionSpec>,
    /// Entry points accepting the option
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_by: Vec<String>,
}

/// Response field tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSpec {
    #[serde(rename = "type")]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub contains: IndexMap<String, ReturnSpec>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Python-style list used in option descriptions
fn state_list<'a>(entries: impl IntoIterator<Item = &'a String>) -> String {
    let quoted: Vec<String> = entries.into_iter().map(|e| format!("'{}'", e)).collect();
    format!("[{}]", quoted.join(", "))
}

impl OptionSpec {
    /// Option for a single parameter, before any merging
    pub fn from_parameter(parameter: &Parameter, config: &GeneratorConfig) -> Self {
        let mapped = &parameter.mapped_type;
        Self {
            name: parameter.name.clone(),
            option_type: mapped.type_name().to_string(),
            required: parameter.required,
            default: parameter.default.clone(),
            description: description_lines(parameter.description.as_deref()),
            choices: mapped.choices().map(<[Value]>::to_vec).unwrap_or_default(),
            elements: mapped.elements().map(String::from),
            location: parameter.location,
            no_log: config.is_no_log(&parameter.name),
            suboptions: mapped
                .fields()
                .map(|fields| {
                    fields
                        .iter()
                        .map(|f| Self::from_parameter(f, config))
                        .collect()
                })
                .unwrap_or_default(),
            used_by: Vec::new(),
        }
    }

    /// Fold another definition of the same option into this one
    fn absorb(&mut self, other: OptionSpec, module: &str, path: &str) -> Result<(), EmissionError> {
        let conflict = |reason: String| EmissionError::ParameterConflict {
            module: module.to_string(),
            parameter: path.to_string(),
            reason,
        };

        if self.option_type != other.option_type || self.elements != other.elements {
            return Err(conflict(format!(
                "type {} vs {}",
                type_label(&self.option_type, self.elements.as_deref()),
                type_label(&other.option_type, other.elements.as_deref()),
            )));
        }

        if let Some(theirs) = other.default {
            if let Some(ours) = &self.default {
                if *ours != theirs {
                    return Err(conflict(format!("default {} vs {}", ours, theirs)));
                }
            } else {
                self.default = Some(theirs);
            }
        }

        for choice in other.choices {
            if !self.choices.contains(&choice) {
                self.choices.push(choice);
            }
        }

        // Two descriptions rarely merge into anything readable; keep the longer
        if other.description.concat().len() > self.description.concat().len() {
            self.description = other.description;
        }

        self.required = self.required && other.required;
        self.no_log |= other.no_log;

        for sub in other.suboptions {
            match self.suboptions.iter_mut().find(|s| s.name == sub.name) {
                Some(existing) => {
                    let sub_path = format!("{}.{}", path, sub.name);
                    existing.absorb(sub, module, &sub_path)?;
                }
                None => self.suboptions.push(sub),
            }
        }

        Ok(())
    }
}

fn type_label(option_type: &str, elements: Option<&str>) -> String {
    match elements {
        Some(elements) => format!("{}[{}]", option_type, elements),
        None => option_type.to_string(),
    }
}

fn description_lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| {
        t.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// An option while it is being merged across entry points
struct MergedOption {
    spec: OptionSpec,
    used_by: BTreeSet<String>,
    required_by: BTreeSet<String>,
    locations: BTreeSet<&'static str>,
}

impl MergedOption {
    fn new(spec: OptionSpec, entry_point: &str) -> Self {
        let (required, location) = (spec.required, spec.location);
        let mut merged = Self {
            spec,
            used_by: BTreeSet::new(),
            required_by: BTreeSet::new(),
            locations: BTreeSet::new(),
        };
        merged.record(entry_point, required, location);
        merged
    }

    fn record(&mut self, entry_point: &str, required: bool, location: Option<ParameterLocation>) {
        self.used_by.insert(entry_point.to_string());
        if required {
            self.required_by.insert(entry_point.to_string());
        }
        if let Some(location) = location {
            self.locations.insert(location.as_str());
        }
    }

    fn finish(mut self, entry_points: usize, has_state: bool) -> OptionSpec {
        let required_everywhere = self.required_by.len() == entry_points;
        self.spec.required = required_everywhere;

        if has_state {
            if !required_everywhere && !self.required_by.is_empty() {
                self.spec.description.push(format!(
                    "Required with I(state={})",
                    state_list(&self.required_by)
                ));
            }
            if self.used_by.len() < entry_points {
                self.spec
                    .description
                    .push(format!("Used by I(state={})", state_list(&self.used_by)));
            }
        }

        if self.locations.len() > 1 {
            self.spec.location = None;
        }
        self.spec.used_by = self.used_by.into_iter().collect();
        self.spec
    }
}

impl ReturnSpec {
    pub fn from_mapped(mapped: &MappedType, description: Option<String>) -> Self {
        let contains = mapped
            .fields()
            .map(|fields| {
                fields
                    .iter()
                    .map(|f| {
                        (
                            f.name.clone(),
                            Self::from_mapped(&f.mapped_type, f.description.clone()),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            return_type: mapped.type_name().to_string(),
            elements: mapped.elements().map(String::from),
            description,
            contains,
        }
    }
}

impl ModuleMetadata {
    /// Build and merge the metadata of a module group
    pub fn build(group: &ModuleGroup, config: &GeneratorConfig) -> Result<Self, EmissionError> {
        let mut merged: BTreeMap<String, MergedOption> = BTreeMap::new();

        for member in &group.members {
            for parameter in member.parameters() {
                let incoming = OptionSpec::from_parameter(parameter, config);
                match merged.get_mut(&parameter.name) {
                    Some(existing) => {
                        existing.spec.absorb(incoming, &group.module_name, &parameter.name)?;
                        existing.record(
                            &member.entry_point,
                            parameter.required,
                            parameter.location,
                        );
                    }
                    None => {
                        merged.insert(
                            parameter.name.clone(),
                            MergedOption::new(incoming, &member.entry_point),
                        );
                    }
                }
            }
        }

        let entry_count = group.members.len();
        let mut options: Vec<OptionSpec> = merged
            .into_values()
            .map(|m| m.finish(entry_count, group.has_state()))
            .collect();
        if group.has_state() {
            options.push(state_option(group));
            options.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let entry_points = group
            .members
            .iter()
            .map(|m| EntryPointSpec {
                name: m.entry_point.clone(),
                action: m.operation().action,
                path: m.operation().path.clone(),
                operation_id: m.operation().operation_id.clone(),
            })
            .collect();

        let returns = group
            .members
            .iter()
            .filter_map(|m| {
                let mapped = m.mapped.returns.as_ref()?;
                let description = m
                    .operation()
                    .response
                    .as_ref()
                    .and_then(|r| r.description.clone());
                Some((m.entry_point.clone(), ReturnSpec::from_mapped(mapped, description)))
            })
            .collect();

        let (short_description, description) = describe(group);

        Ok(Self {
            metadata_version: METADATA_VERSION,
            module: group.module_name.clone(),
            vendor: group.vendor.clone(),
            app: group.app.clone(),
            layout_version: config.layout.version,
            grouping: group.grouping,
            short_description,
            description,
            entry_points,
            options,
            returns,
        })
    }

    /// Option lookup by name
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }
}

fn state_option(group: &ModuleGroup) -> OptionSpec {
    let entries: Vec<String> = group.entry_points().map(String::from).collect();

    OptionSpec {
        name: STATE_ARGUMENT.to_string(),
        option_type: "str".to_string(),
        required: true,
        default: None,
        description: vec!["Action to run on the resource".to_string()],
        choices: entries.iter().cloned().map(Value::String).collect(),
        elements: None,
        location: None,
        no_log: false,
        suboptions: Vec::new(),
        used_by: entries,
    }
}

fn describe(group: &ModuleGroup) -> (String, Vec<String>) {
    match group.members.as_slice() {
        [single] => {
            let doc = single.operation().documentation.clone();
            (doc.clone(), vec![doc])
        }
        members => {
            let short = format!("Handle resource of type {}", group.resource());
            let mut lines = vec![short.clone()];
            lines.extend(
                members
                    .iter()
                    .map(|m| format!("I(state={}): {}", m.entry_point, m.operation().documentation)),
            );
            (short, lines)
        }
    }
}

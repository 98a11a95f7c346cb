//! Module emission
//!
//! Renders one module source file and one metadata file per [`ModuleGroup`].
//! Rendering is pure: the same group and configuration always produce the
//! same bytes.

use crate::grouping::ModuleGroup;
use crate::metadata::{ModuleMetadata, OptionSpec};
use crate::python;
use crate::report::{module_dir, EmittedFile, EmittedModule};
use crate::templates::{self, MODULE_TEMPLATE};
use collection_generator_common::{
    EmissionError, GeneratorConfig, ParameterLocation, ResolvedOperation, Result,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use tera::Tera;
use tracing::debug;

/// Renders module groups into files
pub struct ModuleEmitter {
    tera: Tera,
    config: GeneratorConfig,
}

/// Template context of one module
#[derive(Debug, Serialize)]
struct ModuleContext<'a> {
    vendor: &'a str,
    app: &'a str,
    app_upper: String,
    documentation: String,
    /// (query key, argument name) pairs
    in_query_parameters: Vec<(String, String)>,
    arguments: Vec<Argument>,
    url: String,
    has_state: bool,
    direct_entry: &'a str,
    entry_points: Vec<EntryPointContext<'a>>,
}

#[derive(Debug, Serialize)]
struct Argument {
    name: String,
    /// Python dict literal
    spec: String,
}

#[derive(Debug, Serialize)]
struct EntryPointContext<'a> {
    name: &'a str,
    verb: &'a str,
    /// Python string literal with `str.format` placeholders
    url: String,
    /// (request key, argument name) pairs sent in the body
    accepted_fields: Vec<(String, String)>,
}

/// `DOCUMENTATION` block content
#[derive(Debug, Serialize)]
struct Documentation<'a> {
    module: &'a str,
    short_description: &'a str,
    description: &'a [String],
    options: IndexMap<&'a str, DocOption<'a>>,
    author: &'a [String],
    version_added: &'a str,
    requirements: &'a [String],
}

#[derive(Debug, Serialize)]
struct DocOption<'a> {
    description: &'a [String],
    #[serde(rename = "type")]
    option_type: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a Value>,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    choices: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    elements: Option<&'a str>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    suboptions: IndexMap<&'a str, DocOption<'a>>,
}

impl<'a> DocOption<'a> {
    fn from_option(option: &'a OptionSpec) -> Self {
        Self {
            description: &option.description,
            option_type: &option.option_type,
            required: option.required,
            default: option.default.as_ref(),
            choices: &option.choices,
            elements: option.elements.as_deref(),
            suboptions: doc_options(&option.suboptions),
        }
    }
}

fn doc_options(options: &[OptionSpec]) -> IndexMap<&str, DocOption<'_>> {
    options
        .iter()
        .map(|o| (o.name.as_str(), DocOption::from_option(o)))
        .collect()
}

impl ModuleEmitter {
    /// Create an emitter with the embedded templates
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render the source and metadata files of one module
    pub fn emit(&self, group: &ModuleGroup) -> std::result::Result<EmittedModule, EmissionError> {
        let metadata = ModuleMetadata::build(group, &self.config)?;
        let dir = module_dir(&group.vendor, &group.app);

        let source = self.render_source(group, &metadata)?;
        let metadata_json = serde_json::to_string_pretty(&metadata).map_err(|e| {
            EmissionError::Serialize {
                what: format!("metadata of {}", group.module_name),
                message: e.to_string(),
            }
        })?;

        debug!(
            module = %group.module_name,
            entry_points = group.members.len(),
            options = metadata.options.len(),
            "emitted module"
        );

        Ok(EmittedModule {
            name: group.module_name.clone(),
            source: EmittedFile {
                path: dir.join(format!("{}.py", group.module_name)),
                content: source,
            },
            metadata: EmittedFile {
                path: dir.join(format!("{}.json", group.module_name)),
                content: metadata_json + "\n",
            },
        })
    }

    fn render_source(
        &self,
        group: &ModuleGroup,
        metadata: &ModuleMetadata,
    ) -> std::result::Result<String, EmissionError> {
        let entry_points: Vec<EntryPointContext> = group
            .members
            .iter()
            .map(|member| EntryPointContext {
                name: &member.entry_point,
                verb: member.operation().action.as_str(),
                url: url_literal(&group.app, member),
                accepted_fields: accepted_fields(member),
            })
            .collect();

        let context = ModuleContext {
            vendor: &group.vendor,
            app: &group.app,
            app_upper: group.app.to_uppercase(),
            documentation: self.documentation(metadata)?,
            in_query_parameters: in_query_parameters(group),
            arguments: metadata
                .options
                .iter()
                .map(|o| Argument {
                    name: o.name.clone(),
                    spec: python::literal(&argument_spec(o)),
                })
                .collect(),
            url: entry_points
                .first()
                .map(|e| e.url.clone())
                .unwrap_or_default(),
            has_state: group.has_state(),
            direct_entry: group
                .members
                .first()
                .map(|m| m.entry_point.as_str())
                .unwrap_or_default(),
            entry_points,
        };

        let context = tera::Context::from_serialize(&context).map_err(|e| {
            EmissionError::Serialize {
                what: format!("template context of {}", group.module_name),
                message: e.to_string(),
            }
        })?;

        self.tera
            .render(MODULE_TEMPLATE, &context)
            .map_err(|e| EmissionError::Template {
                template: MODULE_TEMPLATE.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn documentation(&self, metadata: &ModuleMetadata) -> std::result::Result<String, EmissionError> {
        let module = &self.config.module;
        let documentation = Documentation {
            module: &metadata.module,
            short_description: &metadata.short_description,
            description: &metadata.description,
            options: doc_options(&metadata.options),
            author: &module.author,
            version_added: &module.version_added,
            requirements: &module.requirements,
        };

        let yaml = serde_yaml::to_string(&documentation).map_err(|e| EmissionError::Serialize {
            what: format!("DOCUMENTATION of {}", metadata.module),
            message: e.to_string(),
        })?;

        Ok(escape_docstring(&yaml))
    }
}

/// Make text safe inside a non-raw `'''` Python literal
fn escape_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("'''", "\\'\\'\\'")
}

/// `argument_spec` entry of one option
fn argument_spec(option: &OptionSpec) -> Value {
    let mut spec = Map::new();
    spec.insert("type".to_string(), json!(option.option_type));
    if option.required {
        spec.insert("required".to_string(), json!(true));
    }
    if let Some(default) = &option.default {
        spec.insert("default".to_string(), default.clone());
    }
    if !option.choices.is_empty() {
        spec.insert("choices".to_string(), json!(option.choices));
    }
    if let Some(elements) = &option.elements {
        spec.insert("elements".to_string(), json!(elements));
    }
    if option.no_log {
        spec.insert("no_log".to_string(), json!(true));
    }
    if !option.suboptions.is_empty() {
        let options: Map<String, Value> = option
            .suboptions
            .iter()
            .map(|s| (s.name.clone(), argument_spec(s)))
            .collect();
        spec.insert("options".to_string(), Value::Object(options));
    }
    Value::Object(spec)
}

/// URL of an entry point with path placeholders renamed to argument names
fn url_literal(app: &str, member: &ResolvedOperation) -> String {
    let operation = member.operation();
    let mut path = operation.path.clone();
    for parameter in member.parameters() {
        if parameter.location == Some(ParameterLocation::Path) {
            path = path.replace(
                &format!("{{{}}}", parameter.original_name),
                &format!("{{{}}}", parameter.name),
            );
        }
    }

    python::string(&format!(
        "{{{}_hostname}}{}{}",
        app, operation.base_path, path
    ))
}

fn accepted_fields(member: &ResolvedOperation) -> Vec<(String, String)> {
    if !member.operation().action.sends_body() {
        return Vec::new();
    }

    member
        .parameters()
        .iter()
        .filter(|p| {
            matches!(
                p.location,
                Some(ParameterLocation::Body) | Some(ParameterLocation::FormData)
            )
        })
        .map(|p| (p.original_name.clone(), p.name.clone()))
        .collect()
}

fn in_query_parameters(group: &ModuleGroup) -> Vec<(String, String)> {
    group
        .members
        .iter()
        .flat_map(|m| m.parameters())
        .filter(|p| p.location == Some(ParameterLocation::Query))
        .map(|p| (p.original_name.clone(), p.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_operations;
    use collection_generator_common::{
        GroupingPolicy, HttpAction, MappedOperation, MappedType, Operation, Parameter,
        PrimitiveType,
    };
    use pretty_assertions::assert_eq;

    fn parameter(name: &str, original: &str, location: ParameterLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            original_name: original.to_string(),
            location: Some(location),
            mapped_type: MappedType::primitive(PrimitiveType::String),
            required: location == ParameterLocation::Path,
            default: None,
            description: Some("A value".to_string()),
        }
    }

    fn member(action: HttpAction, parameters: Vec<Parameter>) -> ResolvedOperation {
        ResolvedOperation {
            module_name: "widgets_by_widgetid".to_string(),
            entry_point: action.as_str().to_string(),
            mapped: MappedOperation {
                operation: Operation {
                    vendor: "acme".to_string(),
                    app: "widgets".to_string(),
                    resource: "widgets_by_widgetid".to_string(),
                    action,
                    operation_id: None,
                    path: "/widgets/{widgetId}".to_string(),
                    base_path: "/api".to_string(),
                    documentation: "Handle a widget".to_string(),
                    inputs: Vec::new(),
                    response: None,
                },
                parameters,
                returns: None,
            },
        }
    }

    fn emit(members: Vec<ResolvedOperation>, grouping: GroupingPolicy) -> EmittedModule {
        let emitter = ModuleEmitter::new(GeneratorConfig::default()).unwrap();
        let groups = group_operations(members, grouping);
        emitter.emit(&groups[0]).unwrap()
    }

    #[test]
    fn test_paths() {
        let module = emit(
            vec![member(HttpAction::Get, vec![])],
            GroupingPolicy::PerResource,
        );
        assert_eq!(
            module.source.path,
            std::path::PathBuf::from("acme/widgets/plugins/modules/widgets_by_widgetid.py")
        );
        assert_eq!(
            module.metadata.path,
            std::path::PathBuf::from("acme/widgets/plugins/modules/widgets_by_widgetid.json")
        );
    }

    #[test]
    fn test_url_uses_argument_names() {
        let module = emit(
            vec![member(
                HttpAction::Get,
                vec![parameter("widget_id", "widgetId", ParameterLocation::Path)],
            )],
            GroupingPolicy::PerResource,
        );
        assert!(module
            .source
            .content
            .contains("return '{widgets_hostname}/api/widgets/{widget_id}'.format(**params)"));
    }

    #[test]
    fn test_body_fields_and_query_list() {
        let module = emit(
            vec![
                member(
                    HttpAction::Put,
                    vec![
                        parameter("widget_id", "widgetId", ParameterLocation::Path),
                        parameter("display_name", "displayName", ParameterLocation::Body),
                    ],
                ),
                member(
                    HttpAction::Get,
                    vec![
                        parameter("widget_id", "widgetId", ParameterLocation::Path),
                        parameter("verbose", "verbose", ParameterLocation::Query),
                    ],
                ),
            ],
            GroupingPolicy::PerResource,
        );

        let source = &module.source.content;
        assert!(source.contains("IN_QUERY_PARAMETER = [['verbose', 'verbose']]"));
        assert!(source.contains("accepted_fields = [['displayName', 'display_name']]"));
        assert!(source.contains("async def _get(params, session):"));
        assert!(source.contains("async def _put(params, session):"));
        assert!(source.contains("func = globals()[\"_\" + module.params[\"state\"]]"));
        assert!(source.contains(
            "argument_spec['state'] = {'type': 'str', 'required': True, 'choices': ['get', 'put']}"
        ));
        assert!(source.contains("argument_spec['widget_id'] = {'type': 'str', 'required': True}"));
    }

    #[test]
    fn test_per_operation_dispatches_directly() {
        let module = emit(
            vec![member(HttpAction::Delete, vec![])],
            GroupingPolicy::PerOperation,
        );
        let source = &module.source.content;
        assert!(source.contains("return await _delete(module.params, session)"));
        assert!(!source.contains("argument_spec['state']"));
    }

    #[test]
    fn test_no_log_parameters() {
        let module = emit(
            vec![member(
                HttpAction::Post,
                vec![parameter("password", "password", ParameterLocation::Body)],
            )],
            GroupingPolicy::PerOperation,
        );
        assert!(module
            .source
            .content
            .contains("argument_spec['password'] = {'type': 'str', 'no_log': True}"));
    }

    #[test]
    fn test_documentation_block() {
        let module = emit(
            vec![member(
                HttpAction::Get,
                vec![parameter("verbose", "verbose", ParameterLocation::Query)],
            )],
            GroupingPolicy::PerOperation,
        );
        let source = &module.source.content;
        assert!(source.contains("DOCUMENTATION = '''\n"));
        assert!(source.contains("module: widgets_by_widgetid\n"));
        assert!(source.contains("short_description: Handle a widget\n"));
        assert!(source.contains("version_added:"));
    }

    #[test]
    fn test_documentation_escapes_backslashes() {
        let mut directory = parameter("directory", "directory", ParameterLocation::Query);
        directory.description = Some(r"Windows dir like C:\new\table".to_string());

        let module = emit(
            vec![member(HttpAction::Get, vec![directory])],
            GroupingPolicy::PerOperation,
        );
        let source = &module.source.content;
        assert!(!source.contains(r"C:\new"));
        assert!(source.contains(r"C:\\"));
    }

    #[test]
    fn test_escape_docstring() {
        assert_eq!(escape_docstring(r"a\nb"), r"a\\nb");
        assert_eq!(escape_docstring("say '''hi'''"), r"say \'\'\'hi\'\'\'");
    }

    #[test]
    fn test_query_keys_keep_original_names() {
        let module = emit(
            vec![member(
                HttpAction::Get,
                vec![parameter("page_size", "pageSize", ParameterLocation::Query)],
            )],
            GroupingPolicy::PerOperation,
        );
        let source = &module.source.content;
        assert!(source.contains("IN_QUERY_PARAMETER = [['pageSize', 'page_size']]"));
        assert!(source.contains("+ query_string(params)"));
    }

    #[test]
    fn test_metadata_contract() {
        let module = emit(
            vec![member(
                HttpAction::Get,
                vec![parameter("verbose", "verbose", ParameterLocation::Query)],
            )],
            GroupingPolicy::PerOperation,
        );
        let metadata: Value = serde_json::from_str(&module.metadata.content).unwrap();
        assert_eq!(metadata["metadata_version"], json!(1));
        assert_eq!(metadata["grouping"], json!("per_operation"));
        assert_eq!(metadata["entry_points"][0]["action"], json!("get"));
        assert_eq!(metadata["options"][0]["name"], json!("verbose"));
        assert_eq!(metadata["options"][0]["location"], json!("query"));
    }
}

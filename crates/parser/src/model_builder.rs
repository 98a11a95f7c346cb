//! Operation model building
//!
//! Walks the normalized tree and produces one [`Operation`] per declared
//! path + verb pair, in declaration order.

use collection_generator_common::{
    ActionEntry, ActionParameter, NamingConfig, NormalizedSpec, Operation, ParameterLocation,
    SchemaNode,
};
use tracing::debug;

/// Body property whose own properties are lifted to the top level
const SPEC_PROPERTY: &str = "spec";

/// Build the ordered operation list for one vendor/app document
pub fn build_operations(
    spec: &NormalizedSpec,
    vendor: &str,
    app: &str,
    naming: &NamingConfig,
) -> Vec<Operation> {
    let mut operations = Vec::new();

    for entry in &spec.paths {
        let resource = resource_name(&entry.path, &naming.strip_path_prefixes);

        for action in &entry.actions {
            operations.push(Operation {
                vendor: vendor.to_string(),
                app: app.to_string(),
                resource: resource.clone(),
                action: action.action,
                operation_id: action.operation_id.clone(),
                path: entry.path.clone(),
                base_path: spec.info.base_path.clone(),
                documentation: documentation(action, &resource),
                inputs: flatten_inputs(&action.parameters),
                response: action.response.clone(),
            });
        }
    }

    debug!(operations = operations.len(), vendor, app, "built operation model");
    operations
}

/// Derive a resource name from an endpoint path
///
/// # Examples
/// ```
/// use collection_generator_parser::resource_name;
///
/// assert_eq!(resource_name("/api/vcenter/vm/{vm}", &[]), "api_vcenter_vm_by_vm");
/// assert_eq!(resource_name("/data/widgets", &["data".to_string()]), "widgets");
/// ```
pub fn resource_name(path: &str, strip_prefixes: &[String]) -> String {
    let path = path.split('?').next().unwrap_or(path);

    let mut elements: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.contains('{') {
                format!("by_{}", segment)
                    .replace(['{', '}'], "")
                    .replace('=', "_eq_")
                    .replace(':', "_")
                    .to_lowercase()
            } else {
                segment.to_string()
            }
        })
        .collect();

    if elements
        .first()
        .is_some_and(|first| strip_prefixes.iter().any(|p| p == first))
    {
        elements.remove(0);
    }

    let name = elements
        .join("_")
        .replace(['-', ':'], "_")
        .to_lowercase();

    if name.is_empty() {
        "root".to_string()
    } else {
        name
    }
}

/// Flatten request inputs one level
///
/// Object bodies contribute their properties; nested objects and arrays keep
/// their structure. An empty object body contributes nothing.
fn flatten_inputs(parameters: &[ActionParameter]) -> Vec<ActionParameter> {
    let mut inputs = Vec::new();

    for parameter in parameters {
        if parameter.location == ParameterLocation::Body && parameter.schema.is_empty_object() {
            continue;
        }
        if parameter.location != ParameterLocation::Body || !parameter.schema.has_properties() {
            inputs.push(parameter.clone());
            continue;
        }

        for property in &parameter.schema.children {
            if property.name == SPEC_PROPERTY && property.has_properties() {
                inputs.extend(property.children.iter().map(|p| body_input(p.clone())));
            } else {
                inputs.push(body_input(property.clone()));
            }
        }
    }

    inputs
}

fn body_input(schema: SchemaNode) -> ActionParameter {
    ActionParameter {
        name: schema.name.clone(),
        location: ParameterLocation::Body,
        required: schema.required,
        description: schema.description.clone(),
        schema,
    }
}

fn documentation(action: &ActionEntry, resource: &str) -> String {
    action
        .summary
        .as_deref()
        .or(action.description.as_deref())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| format!("Handle resource of type {}", resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{normalize, SpecDocument};
    use collection_generator_common::HttpAction;
    use serde_json::json;

    fn build(value: serde_json::Value) -> Vec<Operation> {
        let spec = normalize(&SpecDocument::from_value(value)).unwrap();
        build_operations(&spec, "acme", "widgets", &NamingConfig::default())
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("/widgets", &[]), "widgets");
        assert_eq!(resource_name("/widgets/{widget_id}", &[]), "widgets_by_widget_id");
        assert_eq!(resource_name("/a/{key=value}", &[]), "a_by_key_eq_value");
        assert_eq!(resource_name("/x-y/z:action?verbose", &[]), "x_y_z_action");
        assert_eq!(resource_name("/", &[]), "root");
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/zeta": {"post": {}, "get": {}},
                "/alpha": {"delete": {}}
            }
        }));

        let order: Vec<(&str, HttpAction)> =
            ops.iter().map(|o| (o.path.as_str(), o.action)).collect();
        assert_eq!(
            order,
            vec![
                ("/zeta", HttpAction::Post),
                ("/zeta", HttpAction::Get),
                ("/alpha", HttpAction::Delete)
            ]
        );
    }

    #[test]
    fn test_operation_without_inputs() {
        let ops = build(json!({"swagger": "2.0", "paths": {"/health": {"get": {}}}}));
        assert_eq!(ops.len(), 1);
        assert!(ops[0].inputs.is_empty());
        assert_eq!(ops[0].documentation, "Handle resource of type health");
    }

    #[test]
    fn test_body_is_flattened_one_level() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/widgets": {
                    "post": {
                        "summary": "Create a widget",
                        "parameters": [{
                            "name": "body",
                            "in": "body",
                            "schema": {
                                "type": "object",
                                "required": ["name"],
                                "properties": {
                                    "name": {"type": "string"},
                                    "size": {
                                        "type": "object",
                                        "properties": {"width": {"type": "integer"}}
                                    },
                                    "tags": {"type": "array", "items": {"type": "string"}}
                                }
                            }
                        }]
                    }
                }
            }
        }));

        let inputs = &ops[0].inputs;
        let names: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["name", "size", "tags"]);
        assert!(inputs[0].required);
        assert!(inputs.iter().all(|i| i.location == ParameterLocation::Body));
        assert_eq!(inputs[1].schema.children[0].name, "width");
        assert!(inputs[2].schema.items().is_some());
        assert_eq!(ops[0].documentation, "Create a widget");
    }

    #[test]
    fn test_spec_property_is_lifted() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/vms": {
                    "post": {
                        "parameters": [{
                            "name": "request_body",
                            "in": "body",
                            "schema": {
                                "type": "object",
                                "properties": {
                                    "spec": {
                                        "type": "object",
                                        "properties": {
                                            "guest_os": {"type": "string"},
                                            "name": {"type": "string"}
                                        }
                                    }
                                }
                            }
                        }]
                    }
                }
            }
        }));

        let names: Vec<&str> = ops[0].inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["guest_os", "name"]);
    }

    #[test]
    fn test_empty_object_body_has_no_inputs() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/widgets/{id}/reset": {
                    "post": {
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "type": "string"},
                            {"name": "body", "in": "body", "schema": {"type": "object", "properties": {}}}
                        ]
                    }
                },
                "/empty": {
                    "post": {
                        "parameters": [{"name": "body", "in": "body", "schema": {"type": "object"}}]
                    }
                }
            }
        }));

        let names: Vec<&str> = ops[0].inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["id"]);
        assert!(ops[1].inputs.is_empty());
    }

    #[test]
    fn test_free_form_body_is_kept() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/labels": {
                    "put": {
                        "parameters": [{
                            "name": "labels",
                            "in": "body",
                            "schema": {"type": "object", "additionalProperties": {"type": "string"}}
                        }]
                    }
                }
            }
        }));
        assert_eq!(ops[0].inputs.len(), 1);
        assert_eq!(ops[0].inputs[0].name, "labels");
    }

    #[test]
    fn test_scalar_body_stays_single_input() {
        let ops = build(json!({
            "swagger": "2.0",
            "paths": {
                "/notes": {
                    "put": {
                        "parameters": [{"name": "text", "in": "body", "schema": {"type": "string"}}]
                    }
                }
            }
        }));
        assert_eq!(ops[0].inputs.len(), 1);
        assert_eq!(ops[0].inputs[0].name, "text");
    }
}

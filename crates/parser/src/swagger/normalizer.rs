//! Schema normalization: `$ref` substitution into an owned tree
//!
//! Reference targets are tracked in a table keyed by JSON pointer. A target
//! is marked in-progress while it is being resolved; meeting an in-progress
//! pointer again means the document is cyclic and normalization fails with
//! the pointer chain instead of recursing forever.

use super::document::SpecDocument;
use collection_generator_common::{
    ActionEntry, ActionParameter, ApiInfo, HttpAction, NormalizationError, NormalizedSpec,
    ParameterLocation, PathEntry, SchemaKind, SchemaNode,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

type Result<T> = std::result::Result<T, NormalizationError>;

/// Response codes whose schema describes the result, in priority order
const RESPONSE_CODES: [&str; 4] = ["200", "201", "202", "default"];

/// Document dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Swagger2,
    OpenApi3,
}

impl Flavor {
    fn definitions_pointer(&self) -> &'static str {
        match self {
            Flavor::Swagger2 => "#/definitions",
            Flavor::OpenApi3 => "#/components/schemas",
        }
    }
}

/// Resolution state of one reference target
#[derive(Debug)]
enum Slot {
    InProgress,
    Resolved(SchemaNode),
}

/// Normalize a raw document into the canonical tree
pub fn normalize(doc: &SpecDocument) -> Result<NormalizedSpec> {
    Normalizer::new(doc.root())?.run()
}

struct Normalizer<'a> {
    root: &'a Value,
    flavor: Flavor,
    table: IndexMap<String, Slot>,
    /// Pointers currently being resolved, outermost first
    stack: Vec<String>,
}

impl<'a> Normalizer<'a> {
    fn new(root: &'a Value) -> Result<Self> {
        let object = root.as_object().ok_or_else(|| NormalizationError::UnsupportedSpec {
            reason: "document root is not an object".to_string(),
        })?;

        let flavor = if object.contains_key("swagger") {
            Flavor::Swagger2
        } else if object.contains_key("openapi") {
            Flavor::OpenApi3
        } else {
            return Err(NormalizationError::UnsupportedSpec {
                reason: "missing 'swagger' or 'openapi' version field".to_string(),
            });
        };

        if !object.get("paths").is_some_and(Value::is_object) {
            return Err(NormalizationError::UnsupportedSpec {
                reason: "missing 'paths' object".to_string(),
            });
        }

        Ok(Self {
            root,
            flavor,
            table: IndexMap::new(),
            stack: Vec::new(),
        })
    }

    fn run(mut self) -> Result<NormalizedSpec> {
        let info = self.api_info();
        let definitions = self.definitions()?;

        let root = self.root;
        let mut paths = Vec::new();
        if let Some(items) = root.get("paths").and_then(Value::as_object) {
            for (path, item) in items {
                let pointer = format!("#/paths/{}", escape_token(path));
                paths.push(self.path_entry(path, item, &pointer)?);
            }
        }

        debug!(
            paths = paths.len(),
            definitions = definitions.len(),
            references = self.table.len(),
            "normalized document"
        );

        Ok(NormalizedSpec {
            info,
            paths,
            definitions,
        })
    }

    fn api_info(&self) -> ApiInfo {
        let info = self.root.get("info");
        let text = |key: &str| {
            info.and_then(|i| i.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let base_path = match self.flavor {
            Flavor::Swagger2 => self
                .root
                .get("basePath")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Flavor::OpenApi3 => self
                .root
                .pointer("/servers/0/url")
                .and_then(Value::as_str)
                .map(server_path)
                .unwrap_or_default(),
        };

        ApiInfo {
            title: text("title"),
            version: text("version"),
            base_path: clean_base_path(&base_path),
        }
    }

    /// Normalize every named schema, used or not
    fn definitions(&mut self) -> Result<Vec<SchemaNode>> {
        let prefix = self.flavor.definitions_pointer();
        let names: Vec<String> = match self.root.pointer(&prefix[1..]) {
            Some(Value::Object(schemas)) => schemas.keys().cloned().collect(),
            Some(_) => {
                return Err(NormalizationError::Malformed {
                    at: prefix.to_string(),
                    reason: "expected an object of named schemas".to_string(),
                })
            }
            None => Vec::new(),
        };

        let mut definitions = Vec::with_capacity(names.len());
        for name in names {
            let reference = format!("{}/{}", prefix, escape_token(&name));
            let mut node = self.resolve_schema_ref(&reference, prefix)?;
            node.name = name;
            definitions.push(node);
        }
        Ok(definitions)
    }

    fn path_entry(&mut self, path: &str, item: &'a Value, pointer: &str) -> Result<PathEntry> {
        let item = self.follow(item, pointer)?;
        let object = as_object(item, pointer)?;

        let shared = match object.get("parameters") {
            Some(list) => self.parameter_list(list, &format!("{}/parameters", pointer))?,
            None => Vec::new(),
        };

        let mut actions = Vec::new();
        for (key, value) in object {
            let Some(action) = HttpAction::from_key(key) else {
                continue;
            };
            let action_pointer = format!("{}/{}", pointer, key);
            actions.push(self.action_entry(action, value, &shared, &action_pointer)?);
        }

        Ok(PathEntry {
            path: path.to_string(),
            actions,
        })
    }

    fn action_entry(
        &mut self,
        action: HttpAction,
        value: &'a Value,
        shared: &[ActionParameter],
        pointer: &str,
    ) -> Result<ActionEntry> {
        let object = as_object(value, pointer)?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        let mut parameters = shared.to_vec();
        if let Some(list) = object.get("parameters") {
            for own in self.parameter_list(list, &format!("{}/parameters", pointer))? {
                match parameters
                    .iter_mut()
                    .find(|p| p.name == own.name && p.location == own.location)
                {
                    Some(existing) => *existing = own,
                    None => parameters.push(own),
                }
            }
        }

        if let Some(body) = object.get("requestBody") {
            if let Some(param) = self.request_body(body, &format!("{}/requestBody", pointer))? {
                parameters.push(param);
            }
        }

        let response = match object.get("responses") {
            Some(responses) => self.response(responses, &format!("{}/responses", pointer))?,
            None => None,
        };

        Ok(ActionEntry {
            action,
            operation_id: text("operationId"),
            summary: text("summary"),
            description: text("description"),
            parameters,
            response,
        })
    }

    fn parameter_list(&mut self, list: &'a Value, pointer: &str) -> Result<Vec<ActionParameter>> {
        let items = list.as_array().ok_or_else(|| NormalizationError::Malformed {
            at: pointer.to_string(),
            reason: "expected a list of parameters".to_string(),
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.parameter(item, &format!("{}/{}", pointer, i)))
            .collect()
    }

    fn parameter(&mut self, value: &'a Value, pointer: &str) -> Result<ActionParameter> {
        let value = self.follow(value, pointer)?;
        let object = as_object(value, pointer)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| NormalizationError::Malformed {
                at: pointer.to_string(),
                reason: "parameter without a name".to_string(),
            })?;
        let location = object
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::from_key)
            .ok_or_else(|| NormalizationError::Malformed {
                at: pointer.to_string(),
                reason: format!("parameter '{}' has no valid 'in' location", name),
            })?;
        let required = object
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(location == ParameterLocation::Path);
        let description = object
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);

        // Swagger 2 non-body parameters carry their type inline
        let mut schema = match object.get("schema") {
            Some(schema) => self.schema(schema, name, &format!("{}/schema", pointer))?,
            None => self.schema(value, name, pointer)?,
        };
        schema.name = name.to_string();
        schema.required = required;
        if schema.description.is_none() {
            schema.description = description.clone();
        }

        Ok(ActionParameter {
            name: name.to_string(),
            location,
            required,
            description,
            schema,
        })
    }

    fn request_body(&mut self, value: &'a Value, pointer: &str) -> Result<Option<ActionParameter>> {
        let value = self.follow(value, pointer)?;
        let object = as_object(value, pointer)?;

        let Some((media, schema)) = pick_media_schema(object) else {
            return Ok(None);
        };
        let required = object
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let description = object
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);

        let schema_pointer = format!("{}/content/{}/schema", pointer, escape_token(media));
        let mut schema = self.schema(schema, "body", &schema_pointer)?;
        schema.required = required;

        Ok(Some(ActionParameter {
            name: "body".to_string(),
            location: ParameterLocation::Body,
            required,
            description,
            schema,
        }))
    }

    fn response(&mut self, responses: &'a Value, pointer: &str) -> Result<Option<SchemaNode>> {
        let responses = as_object(responses, pointer)?;

        for code in RESPONSE_CODES {
            let Some(response) = responses.get(code) else {
                continue;
            };
            let response_pointer = format!("{}/{}", pointer, code);
            let response = self.follow(response, &response_pointer)?;
            let object = as_object(response, &response_pointer)?;

            let found = match self.flavor {
                Flavor::Swagger2 => object
                    .get("schema")
                    .map(|s| (s, format!("{}/schema", response_pointer))),
                Flavor::OpenApi3 => pick_media_schema(object).map(|(media, s)| {
                    (
                        s,
                        format!("{}/content/{}/schema", response_pointer, escape_token(media)),
                    )
                }),
            };

            if let Some((schema, schema_pointer)) = found {
                return self.schema(schema, "response", &schema_pointer).map(Some);
            }
        }

        Ok(None)
    }

    /// Normalize one schema object
    fn schema(&mut self, value: &'a Value, name: &str, pointer: &str) -> Result<SchemaNode> {
        let object = as_object(value, pointer)?;

        if let Some(reference) = object.get("$ref") {
            let reference = reference.as_str().ok_or_else(|| NormalizationError::Malformed {
                at: pointer.to_string(),
                reason: "'$ref' is not a string".to_string(),
            })?;
            let mut node = self.resolve_schema_ref(reference, pointer)?;
            node.name = name.to_string();
            if let Some(description) = object.get("description").and_then(Value::as_str) {
                node.description = Some(description.to_string());
            }
            if let Some(default) = object.get("default") {
                node.default = Some(default.clone());
            }
            return Ok(node);
        }

        let mut node = SchemaNode::new(name, pointer);
        node.declared_type = declared_type(object);
        node.format = object.get("format").and_then(Value::as_str).map(String::from);
        node.description = object
            .get("description")
            .or_else(|| object.get("title"))
            .and_then(Value::as_str)
            .map(String::from);
        node.default = object.get("default").cloned();
        node.additional_properties = object
            .get("additionalProperties")
            .is_some_and(|value| value != &Value::Bool(false));

        if let Some(parts) = object.get("allOf") {
            return self.merge_all_of(node, object, parts, pointer);
        }

        let enum_values = object
            .get("enum")
            .and_then(Value::as_array)
            .filter(|values| !values.is_empty());

        if let Some(values) = enum_values {
            node.kind = SchemaKind::Enum;
            node.enum_values = values.clone();
        } else if node.declared_type.as_deref() == Some("array")
            || (node.declared_type.is_none() && object.contains_key("items"))
        {
            node.kind = SchemaKind::Array;
            let item = match object.get("items") {
                Some(items) => self.schema(items, name, &format!("{}/items", pointer))?,
                None => SchemaNode::new(name, format!("{}/items", pointer)),
            };
            node.children.push(item);
        } else if node.declared_type.as_deref() == Some("object")
            || (node.declared_type.is_none() && object.contains_key("properties"))
        {
            node.kind = SchemaKind::Object;
            node.children = self.properties(object, pointer)?;
        }

        Ok(node)
    }

    fn properties(
        &mut self,
        object: &'a Map<String, Value>,
        pointer: &str,
    ) -> Result<Vec<SchemaNode>> {
        let required: Vec<&str> = object
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let Some(properties) = object.get("properties") else {
            return Ok(Vec::new());
        };
        let properties = as_object(properties, &format!("{}/properties", pointer))?;

        let mut children = Vec::with_capacity(properties.len());
        for (key, value) in properties {
            let child_pointer = format!("{}/properties/{}", pointer, escape_token(key));
            let mut child = self.schema(value, key, &child_pointer)?;
            child.required = required.contains(&key.as_str());
            children.push(child);
        }
        Ok(children)
    }

    /// Merge `allOf` members and the schema's own properties into one object
    fn merge_all_of(
        &mut self,
        mut node: SchemaNode,
        object: &'a Map<String, Value>,
        parts: &'a Value,
        pointer: &str,
    ) -> Result<SchemaNode> {
        let parts = parts.as_array().ok_or_else(|| NormalizationError::Malformed {
            at: format!("{}/allOf", pointer),
            reason: "expected a list of schemas".to_string(),
        })?;

        node.kind = SchemaKind::Object;
        node.declared_type = Some("object".to_string());

        let mut merged: Vec<SchemaNode> = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let part = self.schema(part, &node.name, &format!("{}/allOf/{}", pointer, i))?;
            if node.description.is_none() {
                node.description = part.description.clone();
            }
            node.additional_properties |= part.additional_properties;
            if part.kind == SchemaKind::Object {
                merge_children(&mut merged, part.children);
            }
        }
        let own = self.properties(object, pointer)?;
        merge_children(&mut merged, own);

        node.children = merged;
        Ok(node)
    }

    /// Resolve a schema reference through the pointer table
    fn resolve_schema_ref(&mut self, reference: &str, at: &str) -> Result<SchemaNode> {
        match self.table.get(reference) {
            Some(Slot::Resolved(node)) => return Ok(node.clone()),
            Some(Slot::InProgress) => {
                let start = self
                    .stack
                    .iter()
                    .position(|p| p == reference)
                    .unwrap_or_default();
                let mut path = self.stack[start..].to_vec();
                path.push(reference.to_string());
                return Err(NormalizationError::CyclicReference { path });
            }
            None => {}
        }

        let target = self.lookup(reference, at)?;
        let name = reference.rsplit('/').next().unwrap_or(reference).to_string();

        self.table.insert(reference.to_string(), Slot::InProgress);
        self.stack.push(reference.to_string());
        let result = self.schema(target, &name, reference);
        self.stack.pop();

        let node = result?;
        self.table
            .insert(reference.to_string(), Slot::Resolved(node.clone()));
        Ok(node)
    }

    /// Follow non-schema references (parameters, responses, bodies) to their target
    fn follow(&self, value: &'a Value, at: &str) -> Result<&'a Value> {
        let mut current = value;
        let mut chain: Vec<String> = Vec::new();

        while let Some(reference) = current.get("$ref").and_then(Value::as_str) {
            if chain.iter().any(|seen| seen == reference) {
                chain.push(reference.to_string());
                return Err(NormalizationError::CyclicReference { path: chain });
            }
            chain.push(reference.to_string());
            current = self.lookup(reference, at)?;
        }
        Ok(current)
    }

    fn lookup(&self, reference: &str, at: &str) -> Result<&'a Value> {
        let unresolved = || NormalizationError::UnresolvedReference {
            reference: reference.to_string(),
            at: at.to_string(),
        };

        let pointer = reference.strip_prefix('#').ok_or_else(unresolved)?;
        self.root.pointer(pointer).ok_or_else(unresolved)
    }
}

fn as_object<'v>(value: &'v Value, pointer: &str) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| NormalizationError::Malformed {
        at: pointer.to_string(),
        reason: "expected an object".to_string(),
    })
}

/// `type` may be a string or, in newer documents, a list including "null"
fn declared_type(object: &Map<String, Value>) -> Option<String> {
    match object.get("type")? {
        Value::String(t) => Some(t.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(String::from),
        _ => None,
    }
}

/// Prefer a JSON media type, otherwise the first declared one
fn pick_media_schema(object: &Map<String, Value>) -> Option<(&str, &Value)> {
    let content = object.get("content")?.as_object()?;
    let media = content
        .keys()
        .find(|k| k.as_str() == "application/json")
        .or_else(|| content.keys().next())?;
    content
        .get(media)?
        .get("schema")
        .map(|schema| (media.as_str(), schema))
}

fn merge_children(merged: &mut Vec<SchemaNode>, children: Vec<SchemaNode>) {
    for child in children {
        match merged.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => merged.push(child),
        }
    }
}

/// Path component of a server URL
fn server_path(url: &str) -> String {
    match url.split_once("://") {
        Some((_, rest)) => rest
            .find('/')
            .map(|i| rest[i..].to_string())
            .unwrap_or_default(),
        None => url.to_string(),
    }
}

fn clean_base_path(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

/// Escape a key for use as a JSON pointer token
fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize_value(value: Value) -> Result<NormalizedSpec> {
        normalize(&SpecDocument::from_value(value))
    }

    #[test]
    fn test_rejects_missing_paths() {
        let err = normalize_value(json!({"swagger": "2.0"})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnsupportedSpec { .. }));
    }

    #[test]
    fn test_rejects_missing_version_marker() {
        let err = normalize_value(json!({"paths": {}})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnsupportedSpec { .. }));
    }

    #[test]
    fn test_base_path_slash_is_empty() {
        let spec = normalize_value(json!({"swagger": "2.0", "basePath": "/", "paths": {}})).unwrap();
        assert_eq!(spec.info.base_path, "");
    }

    #[test]
    fn test_openapi_server_base_path() {
        let spec = normalize_value(json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://api.example.com/v2/"}],
            "paths": {}
        }))
        .unwrap();
        assert_eq!(spec.info.base_path, "/v2");
    }

    #[test]
    fn test_resolves_nested_references() {
        let spec = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {
                "Widget": {
                    "type": "object",
                    "required": ["owner"],
                    "properties": {
                        "owner": {"$ref": "#/definitions/Owner"}
                    }
                },
                "Owner": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        }))
        .unwrap();

        let widget = &spec.definitions[0];
        assert_eq!(widget.name, "Widget");
        let owner = &widget.children[0];
        assert_eq!(owner.name, "owner");
        assert!(owner.required);
        assert_eq!(owner.kind, SchemaKind::Object);
        assert_eq!(owner.children[0].declared_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_detects_indirect_cycle() {
        let err = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {
                "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
                "B": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}}
            }
        }))
        .unwrap_err();

        assert_eq!(
            err,
            NormalizationError::CyclicReference {
                path: vec![
                    "#/definitions/A".to_string(),
                    "#/definitions/B".to_string(),
                    "#/definitions/A".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_detects_self_reference_through_array() {
        let err = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}
                    }
                }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizationError::CyclicReference { .. }));
    }

    #[test]
    fn test_shared_reference_is_not_a_cycle() {
        let spec = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {
                "Pair": {
                    "type": "object",
                    "properties": {
                        "left": {"$ref": "#/definitions/Leaf"},
                        "right": {"$ref": "#/definitions/Leaf"}
                    }
                },
                "Leaf": {"type": "integer"}
            }
        }))
        .unwrap();
        assert_eq!(spec.definitions[0].children.len(), 2);
    }

    #[test]
    fn test_dangling_reference() {
        let err = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {"A": {"$ref": "#/definitions/Missing"}}
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizationError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_external_reference_is_unresolved() {
        let err = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {"A": {"$ref": "other.json#/definitions/B"}}
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizationError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_all_of_merges_properties() {
        let spec = normalize_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": {
                "Base": {"type": "object", "properties": {"id": {"type": "string"}}},
                "Extended": {
                    "allOf": [{"$ref": "#/definitions/Base"}],
                    "properties": {"size": {"type": "integer"}}
                }
            }
        }))
        .unwrap();
        let names: Vec<&str> = spec.definitions[1]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "size"]);
    }

    #[test]
    fn test_path_level_parameters_are_merged() {
        let spec = normalize_value(json!({
            "swagger": "2.0",
            "paths": {
                "/widgets/{id}": {
                    "parameters": [{"name": "id", "in": "path", "type": "string"}],
                    "get": {
                        "parameters": [{"name": "verbose", "in": "query", "type": "boolean"}]
                    },
                    "delete": {
                        "parameters": [
                            {"name": "id", "in": "path", "type": "integer", "required": true}
                        ]
                    }
                }
            }
        }))
        .unwrap();

        let actions = &spec.paths[0].actions;
        assert_eq!(actions[0].action, HttpAction::Get);
        assert_eq!(actions[0].parameters.len(), 2);
        assert_eq!(actions[0].parameters[0].name, "id");
        assert!(actions[0].parameters[0].required);
        assert_eq!(
            actions[1].parameters[0].schema.declared_type.as_deref(),
            Some("integer")
        );
    }

    #[test]
    fn test_parameter_reference_and_request_body() {
        let spec = normalize_value(json!({
            "openapi": "3.0.0",
            "paths": {
                "/widgets": {
                    "post": {
                        "parameters": [{"$ref": "#/components/parameters/Tenant"}],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Widget"}
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "created",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Widget"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "parameters": {
                    "Tenant": {"name": "tenant", "in": "header", "schema": {"type": "string"}}
                },
                "schemas": {
                    "Widget": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            }
        }))
        .unwrap();

        let post = &spec.paths[0].actions[0];
        assert_eq!(post.parameters[0].name, "tenant");
        assert_eq!(post.parameters[0].location, ParameterLocation::Header);
        assert_eq!(post.parameters[1].location, ParameterLocation::Body);
        assert!(post.parameters[1].required);
        assert_eq!(post.response.as_ref().map(|r| r.kind), Some(SchemaKind::Object));
    }

    #[test]
    fn test_defaults_are_verbatim() {
        let spec = normalize_value(json!({
            "swagger": "2.0",
            "paths": {
                "/widgets": {
                    "get": {
                        "parameters": [
                            {"name": "limit", "in": "query", "type": "integer", "default": 10}
                        ]
                    }
                }
            }
        }))
        .unwrap();
        assert_eq!(
            spec.paths[0].actions[0].parameters[0].schema.default,
            Some(json!(10))
        );
    }

    #[test]
    fn test_escape_token() {
        assert_eq!(escape_token("/a/{b}"), "~1a~1{b}");
        assert_eq!(escape_token("x~y"), "x~0y");
    }
}

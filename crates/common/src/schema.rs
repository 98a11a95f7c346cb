//! Canonical schema tree produced by the normalizer
//!
//! Nothing in here points back into the raw document: every `$ref` has been
//! substituted and every node owns its children.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structural kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Primitive,
    Object,
    Array,
    Enum,
}

/// A fully resolved schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Property or parameter name this node was reached through
    pub name: String,

    pub kind: SchemaKind,

    /// `type` as written in the document, if any
    pub declared_type: Option<String>,

    /// `format` (int32, int64, date-time, ...)
    pub format: Option<String>,

    /// Whether the owning object lists this node as required
    pub required: bool,

    /// Default value, verbatim
    pub default: Option<Value>,

    pub description: Option<String>,

    /// Enum values in declaration order (only for `SchemaKind::Enum`)
    pub enum_values: Vec<Value>,

    /// Object properties in declaration order, or the single array item
    pub children: Vec<SchemaNode>,

    /// `additionalProperties` is declared and not `false`
    #[serde(default)]
    pub additional_properties: bool,

    /// JSON pointer of the node in the source document
    pub pointer: String,
}

impl SchemaNode {
    /// Create an empty primitive node
    pub fn new(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Primitive,
            declared_type: None,
            format: None,
            required: false,
            default: None,
            description: None,
            enum_values: Vec::new(),
            children: Vec::new(),
            additional_properties: false,
            pointer: pointer.into(),
        }
    }

    /// Element schema of an array node
    pub fn items(&self) -> Option<&SchemaNode> {
        match self.kind {
            SchemaKind::Array => self.children.first(),
            _ => None,
        }
    }

    /// True for objects with at least one declared property
    pub fn has_properties(&self) -> bool {
        self.kind == SchemaKind::Object && !self.children.is_empty()
    }

    /// An object that can carry no data: no properties, no free-form keys
    pub fn is_empty_object(&self) -> bool {
        self.kind == SchemaKind::Object && self.children.is_empty() && !self.additional_properties
    }
}

/// HTTP verb of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpAction {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpAction {
    /// Parse a path-item key; non-verb keys (`parameters`, `x-*`) yield `None`
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
        }
    }

    /// Verbs whose request carries a JSON body
    pub fn sends_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
    FormData,
}

impl ParameterLocation {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            "body" => Some(Self::Body),
            "formData" => Some(Self::FormData),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }
}

/// API-level information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    /// Path prefix every endpoint lives under; empty for `/`
    pub base_path: String,
}

/// One resolved request parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: SchemaNode,
}

/// One verb on one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: HttpAction,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Path-level parameters merged with the action's own, in declaration order
    pub parameters: Vec<ActionParameter>,
    pub response: Option<SchemaNode>,
}

/// A path and its actions, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    pub path: String,
    pub actions: Vec<ActionEntry>,
}

/// Root of the canonical tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSpec {
    pub info: ApiInfo,
    pub paths: Vec<PathEntry>,
    /// Every named schema (definitions / components.schemas), resolved
    pub definitions: Vec<SchemaNode>,
}

//! Operation model, mapped parameter model and resolved identifiers

use crate::schema::{ActionParameter, HttpAction, ParameterLocation, SchemaNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One generatable unit: a single action on a single path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub vendor: String,
    pub app: String,
    /// Resource name derived from the path (e.g. `widgets_by_widget_id`)
    pub resource: String,
    pub action: HttpAction,
    pub operation_id: Option<String>,
    pub path: String,
    pub base_path: String,
    pub documentation: String,
    /// Inputs flattened one level from the action's parameters
    pub inputs: Vec<ActionParameter>,
    pub response: Option<SchemaNode>,
}

impl Operation {
    /// Human readable label used in diagnostics
    pub fn label(&self) -> String {
        match &self.operation_id {
            Some(id) => format!("{} ({} {})", id, self.action.as_str().to_uppercase(), self.path),
            None => format!("{} {}", self.action.as_str().to_uppercase(), self.path),
        }
    }
}

/// Scalar argument types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Float,
    Boolean,
}

impl PrimitiveType {
    /// Name in the module argument vocabulary
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
        }
    }
}

/// A schema mapped into the module argument vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappedType {
    Primitive { primitive: PrimitiveType },
    /// Choice-constrained scalar; `base` decides the argument type
    Enum {
        base: PrimitiveType,
        choices: Vec<Value>,
    },
    List { element: Box<MappedType> },
    /// Structured value; an empty field list is a free-form dictionary
    Object { fields: Vec<Parameter> },
}

impl MappedType {
    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::Primitive { primitive }
    }

    pub fn list(element: MappedType) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    /// Name in the module argument vocabulary
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Primitive { primitive } => primitive.type_name(),
            Self::Enum { base, .. } => base.type_name(),
            Self::List { .. } => "list",
            Self::Object { .. } => "dict",
        }
    }

    /// Element type name for lists
    pub fn elements(&self) -> Option<&'static str> {
        match self {
            Self::List { element } => Some(element.type_name()),
            _ => None,
        }
    }

    /// Allowed values, for enums and lists of enums
    pub fn choices(&self) -> Option<&[Value]> {
        match self {
            Self::Enum { choices, .. } => Some(choices),
            Self::List { element } => element.choices(),
            _ => None,
        }
    }

    /// Nested sub-parameters, for objects and lists of objects
    pub fn fields(&self) -> Option<&[Parameter]> {
        match self {
            Self::Object { fields } if !fields.is_empty() => Some(fields),
            Self::List { element } => element.fields(),
            _ => None,
        }
    }

    /// Mutable access to nested sub-parameters
    pub fn fields_mut(&mut self) -> Option<&mut Vec<Parameter>> {
        match self {
            Self::Object { fields } => Some(fields),
            Self::List { element } => element.fields_mut(),
            _ => None,
        }
    }
}

/// One module argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Normalized identifier (equal to `original_name` until name resolution)
    pub name: String,
    /// Name as written in the document
    pub original_name: String,
    /// Request location; `None` for nested fields
    pub location: Option<ParameterLocation>,
    pub mapped_type: MappedType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

/// An operation whose inputs and response went through the type mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedOperation {
    pub operation: Operation,
    pub parameters: Vec<Parameter>,
    pub returns: Option<MappedType>,
}

/// An operation with collision-free identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOperation {
    /// Module (file stem) this operation is emitted into
    pub module_name: String,
    /// Entry point name inside the module
    pub entry_point: String,
    pub mapped: MappedOperation,
}

impl ResolvedOperation {
    pub fn operation(&self) -> &Operation {
        &self.mapped.operation
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.mapped.parameters
    }
}

//! Type mapping from normalized schemas to module argument types
//!
//! Maps [`SchemaNode`]s to the closed [`MappedType`] vocabulary. Anything
//! outside the table is rejected rather than guessed.

use collection_generator_common::{
    ActionParameter, MappedOperation, MappedType, Operation, Parameter, PrimitiveType,
    SchemaKind, SchemaNode, UnsupportedTypeError,
};
use serde_json::Value;

/// Maps schema nodes to [`MappedType`]
pub struct TypeMapper;

impl TypeMapper {
    /// Map a schema node to its argument type
    ///
    /// # Examples
    /// ```
    /// use collection_generator_common::{MappedType, PrimitiveType, SchemaNode};
    /// use collection_generator_parser::TypeMapper;
    ///
    /// let mut node = SchemaNode::new("limit", "#/paths/~1widgets/get/parameters/0");
    /// node.declared_type = Some("integer".to_string());
    /// assert_eq!(
    ///     TypeMapper::map_type(&node).unwrap(),
    ///     MappedType::primitive(PrimitiveType::Integer)
    /// );
    /// ```
    pub fn map_type(node: &SchemaNode) -> Result<MappedType, UnsupportedTypeError> {
        match node.kind {
            SchemaKind::Enum => Self::map_enum(node),
            SchemaKind::Array => {
                let element = match node.items() {
                    Some(items) => Self::map_type(items)?,
                    None => MappedType::primitive(PrimitiveType::String),
                };
                Ok(MappedType::list(element))
            }
            SchemaKind::Object => {
                let fields = node
                    .children
                    .iter()
                    .map(Self::map_field)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MappedType::Object { fields })
            }
            SchemaKind::Primitive => Self::map_primitive(node).map(MappedType::primitive),
        }
    }

    /// Enums keep the scalar type of their values
    ///
    /// String enums with non-string values get their choices stringified so
    /// that the argument type and the choices agree.
    fn map_enum(node: &SchemaNode) -> Result<MappedType, UnsupportedTypeError> {
        let base = match node.declared_type {
            Some(_) => Self::map_primitive(node)?,
            None => infer_base(&node.enum_values),
        };

        let choices = match base {
            PrimitiveType::String => node
                .enum_values
                .iter()
                .map(|value| match value {
                    Value::String(_) => value.clone(),
                    other => Value::String(other.to_string()),
                })
                .collect(),
            _ => node.enum_values.clone(),
        };

        Ok(MappedType::Enum { base, choices })
    }

    fn map_primitive(node: &SchemaNode) -> Result<PrimitiveType, UnsupportedTypeError> {
        match node.declared_type.as_deref() {
            // Untyped parameters are strings in Swagger
            None | Some("string") => Ok(PrimitiveType::String),
            Some("integer") => Ok(PrimitiveType::Integer),
            Some("number") => Ok(PrimitiveType::Float),
            Some("boolean") => Ok(PrimitiveType::Boolean),
            Some(other) => Err(UnsupportedTypeError {
                schema_path: node.pointer.clone(),
                declared_type: other.to_string(),
            }),
        }
    }

    /// Map a nested object property
    fn map_field(node: &SchemaNode) -> Result<Parameter, UnsupportedTypeError> {
        let mapped_type = Self::map_type(node)?;
        Ok(Parameter {
            name: node.name.clone(),
            original_name: node.name.clone(),
            location: None,
            default: coerce_default(&mapped_type, node.default.as_ref()),
            mapped_type,
            required: node.required,
            description: node.description.clone(),
        })
    }

    /// Map one top-level operation input
    pub fn map_parameter(input: &ActionParameter) -> Result<Parameter, UnsupportedTypeError> {
        let mapped_type = Self::map_type(&input.schema)?;
        Ok(Parameter {
            name: input.name.clone(),
            original_name: input.name.clone(),
            location: Some(input.location),
            default: coerce_default(&mapped_type, input.schema.default.as_ref()),
            mapped_type,
            required: input.required,
            description: input
                .description
                .clone()
                .or_else(|| input.schema.description.clone()),
        })
    }

    /// Map every input and the response of an operation
    pub fn map_operation(operation: Operation) -> Result<MappedOperation, UnsupportedTypeError> {
        let parameters = operation
            .inputs
            .iter()
            .map(Self::map_parameter)
            .collect::<Result<Vec<_>, _>>()?;

        let returns = operation
            .response
            .as_ref()
            .map(Self::map_type)
            .transpose()?;

        Ok(MappedOperation {
            operation,
            parameters,
            returns,
        })
    }
}

/// Defaults of stringified enums must match one of the choices
fn coerce_default(mapped: &MappedType, default: Option<&Value>) -> Option<Value> {
    match (mapped, default) {
        (
            MappedType::Enum {
                base: PrimitiveType::String,
                ..
            },
            Some(value @ (Value::Number(_) | Value::Bool(_))),
        ) => Some(Value::String(value.to_string())),
        (_, default) => default.cloned(),
    }
}

fn infer_base(values: &[Value]) -> PrimitiveType {
    if values.is_empty() {
        PrimitiveType::String
    } else if values.iter().all(Value::is_boolean) {
        PrimitiveType::Boolean
    } else if values.iter().all(|v| v.is_i64() || v.is_u64()) {
        PrimitiveType::Integer
    } else if values.iter().all(Value::is_number) {
        PrimitiveType::Float
    } else {
        PrimitiveType::String
    }
}

//! Template loading and management

use crate::python;
use collection_generator_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Name of the module source template
pub const MODULE_TEMPLATE: &str = "module.py";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("py_literal", py_literal_filter);

    tera.add_raw_template(MODULE_TEMPLATE, include_str!("../templates/module.py.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load module.py template: {}", e))
        })?;

    Ok(tera)
}

/// Filter rendering any value as a Python literal
fn py_literal_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(python::literal(value)))
}

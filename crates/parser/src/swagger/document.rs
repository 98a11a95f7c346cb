//! Raw specification document loading

use collection_generator_common::{GeneratorError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A parsed, not yet normalized, Swagger/OpenAPI document
///
/// Key order of the source is preserved, so declaration order survives into
/// the operation model.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Value,
}

impl SpecDocument {
    /// Load a document from a file path
    ///
    /// `.yaml` / `.yml` files are read as YAML, everything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let doc = SpecDocument::from_file("src/swagger/acme/widgets/widgets.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read specification file {}: {}",
                path.display(),
                e
            ))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let root = serde_json::from_str(json)?;
        Ok(Self { root })
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let root = serde_yaml::from_str(yaml)?;
        Ok(Self { root })
    }

    /// Wrap an already parsed tree
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Root of the raw tree
    pub fn root(&self) -> &Value {
        &self.root
    }
}

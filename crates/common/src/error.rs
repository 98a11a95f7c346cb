//! Error taxonomy for the compiler pipeline
//!
//! Document-scoped failures ([`NormalizationError`]) abort a whole document.
//! Operation-scoped failures ([`UnsupportedTypeError`], [`NameCollisionError`],
//! [`EmissionError`]) are recorded per operation and never stop siblings.

use thiserror::Error;

/// Errors that can occur while compiling a document
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Structural problems that make a whole document unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Unsupported specification: {reason}")]
    UnsupportedSpec { reason: String },

    #[error("Cyclic reference: {}", path.join(" -> "))]
    CyclicReference {
        /// Pointer chain, starting and ending at the same reference
        path: Vec<String>,
    },

    #[error("Unresolved reference '{reference}' at {at}")]
    UnresolvedReference { reference: String, at: String },

    #[error("Malformed document at {at}: {reason}")]
    Malformed { at: String, reason: String },
}

/// A schema type with no mapping in the module argument vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported type '{declared_type}' at {schema_path}")]
pub struct UnsupportedTypeError {
    pub schema_path: String,
    pub declared_type: String,
}

/// Two identifiers that still collide after disambiguation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Name collision on '{path}' between {}", names.join(", "))]
pub struct NameCollisionError {
    /// Original (pre-normalization) names involved in the collision
    pub names: Vec<String>,
    /// Generated identifier they all resolve to
    pub path: String,
}

/// Failures while rendering one module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmissionError {
    #[error("Template error in {template}: {message}")]
    Template { template: String, message: String },

    #[error("Failed to serialize {what}: {message}")]
    Serialize { what: String, message: String },

    #[error("Parameter '{parameter}' of module '{module}' has conflicting definitions: {reason}")]
    ParameterConflict {
        module: String,
        parameter: String,
        reason: String,
    },

    #[error("Two outputs share the path {path}")]
    DuplicatePath { path: String },
}

//! Common types and utilities for the collection generator
//!
//! This crate contains the intermediate representations shared by every
//! pipeline stage, the error taxonomy, and the YAML generator configuration.

mod config;
mod error;
mod operation;
mod schema;

pub use config::{
    GeneratorConfig, GroupingPolicy, ModuleInfo, NamingConfig, OutputLayout, CONFIG_VERSION,
    LAYOUT_VERSION,
};
pub use error::{
    EmissionError, GeneratorError, NameCollisionError, NormalizationError, Result,
    UnsupportedTypeError,
};
pub use operation::{
    MappedOperation, MappedType, Operation, Parameter, PrimitiveType, ResolvedOperation,
};
pub use schema::{
    ActionEntry, ActionParameter, ApiInfo, HttpAction, NormalizedSpec, ParameterLocation,
    PathEntry, SchemaKind, SchemaNode,
};

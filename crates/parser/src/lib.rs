//! Swagger/OpenAPI front end for the collection generator
//!
//! This crate turns a raw specification document into operations that are
//! ready for emission.
//!
//! ## Pipeline
//!
//! 1. [`swagger::normalize`] resolves every `$ref` into a [`NormalizedSpec`]
//!    tree and rejects cycles
//! 2. [`build_operations`] enumerates path + verb pairs in declaration order
//!    and flattens request bodies one level
//! 3. [`TypeMapper`] maps schemas to the module argument vocabulary
//! 4. [`resolve`] assigns collision-free module, entry point and parameter
//!    names
//!
//! Each stage only reads what the previous one produced.
//!
//! [`NormalizedSpec`]: collection_generator_common::NormalizedSpec

mod model_builder;
mod name_resolver;
pub mod swagger;
mod type_mapper;

pub use model_builder::{build_operations, resource_name};
pub use name_resolver::{
    connection_arguments, normalize_identifier, resolve, NameResolver, RejectedOperation,
    Resolution, STATE_ARGUMENT,
};
pub use swagger::{normalize, SpecDocument};
pub use type_mapper::TypeMapper;

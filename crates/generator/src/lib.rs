//! Module emission for generated automation collections
//!
//! This crate turns the resolved operations produced by
//! `collection-generator-parser` into module sources and metadata files:
//! - `<vendor>/<app>/plugins/modules/<module>.py`
//! - `<vendor>/<app>/plugins/modules/<module>.json`
//!
//! [`Compiler`] drives the whole pipeline for one document and returns a
//! [`CompileReport`]; [`write_report`] puts the result on disk.
//!
//! ## Example
//! ```rust,ignore
//! use collection_generator_common::GeneratorConfig;
//! use collection_generator_generator::{write_report, Compiler};
//! use collection_generator_parser::SpecDocument;
//!
//! let doc = SpecDocument::from_file("swagger/acme/widgets/widgets.json")?;
//! let report = Compiler::new(GeneratorConfig::default())?.compile(&doc, "acme", "widgets");
//! write_report(&report, Path::new("collections"), true)?;
//! ```

mod compiler;
mod emitter;
mod grouping;
mod metadata;
pub mod python;
mod report;
mod templates;
mod writer;

pub use compiler::Compiler;
pub use emitter::ModuleEmitter;
pub use grouping::{group_operations, ModuleGroup};
pub use metadata::{EntryPointSpec, ModuleMetadata, OptionSpec, ReturnSpec, METADATA_VERSION};
pub use report::{
    module_dir, CompileError, CompileReport, Diagnostic, EmittedFile, EmittedModule, Scope,
    Severity,
};
pub use writer::{write_report, WriteSummary};

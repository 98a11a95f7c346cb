//! Swagger 2.0 / OpenAPI 3.x document handling
//!
//! Loads a raw document and normalizes it into the canonical tree consumed by
//! the operation model builder.
//!
//! ## Supported shapes
//! - **Swagger 2.0**: `definitions`, `basePath`, `in: body` parameters
//! - **OpenAPI 3.x**: `components`, `servers`, `requestBody`
//!
//! Only document-internal references (`#/...`) are followed.
//!
//! ## Usage
//! ```rust,ignore
//! use collection_generator_parser::swagger::{normalize, SpecDocument};
//!
//! let doc = SpecDocument::from_file("src/swagger/acme/widgets/widgets.json")?;
//! let spec = normalize(&doc)?;
//! ```

mod document;
mod normalizer;

pub use document::SpecDocument;
pub use normalizer::normalize;

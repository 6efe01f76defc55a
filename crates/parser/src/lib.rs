//! Schema normalization and resource resolution for API descriptions
//!
//! This crate turns Swagger 2.x and OpenAPI 3.x documents into the
//! documentation model defined in `apidox-common`.
//!
//! ## Pipeline
//!
//! 1. Local `$ref`s are expanded in the untyped document tree
//!    ([`reference::expand_refs`])
//! 2. A dialect adapter ([`swagger`], [`openapi`]) decodes the tree and
//!    projects it into a neutral [`document::ApiDocument`]
//! 3. The [`builder`] groups operations into API groups and methods,
//!    resolving every body and response schema through [`schema::resolve`]
//! 4. Resolved resources are cross-linked with the methods that use them in
//!    a per-version cache ([`cache::link`])
//!
//! Structural problems in a document abort the whole load with a
//! [`SpecError`](apidox_common::SpecError); nothing is returned for a
//! malformed document.
//!
//! ## Usage
//! ```rust,ignore
//! use apidox_parser::ApiSuite;
//!
//! let mut suite = ApiSuite::with_files(false);
//! let id = suite.load("petstore.json")?;
//! let spec = suite.get(&id).unwrap();
//! ```

pub mod builder;
pub mod cache;
pub mod document;
pub mod extensions;
pub mod json;
pub mod loader;
pub mod markdown;
pub mod naming;
pub mod openapi;
pub mod reference;
pub mod schema;
pub mod swagger;

pub use builder::{build, load_into};
pub use loader::{load_document, ApiSuite, Dialect, DocumentSource, FileSource};
pub use openapi::OpenApiParser;
pub use swagger::SwaggerParser;

use apidox_common::{Result, Specification};

/// Load a single document from the filesystem and build its specification
pub fn parse_file(path: &str) -> Result<Specification> {
    build(&load_document(&FileSource, path)?)
}

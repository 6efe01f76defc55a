//! Common types and utilities for apidox
//!
//! This crate contains the resolved documentation model (specification,
//! API groups, methods, resources), the error type shared by the parser and
//! CLI, and the suite configuration file format.

pub mod config;
pub mod model;

pub use config::SuiteConfig;
pub use model::*;

use thiserror::Error;

/// Errors that can occur while loading a specification
///
/// Structural variants describe a document that violates an invariant the
/// resolver depends on. They abort the whole load; there is no partial output.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Document {0} is neither a Swagger 2.x nor an OpenAPI 3.x document")]
    UnknownDialect(String),

    #[error("Specification {url} does not have an info.title member")]
    MissingInfoTitle { url: String },

    #[error("Operation '{id}' does not have an operationId or summary member")]
    MissingOperationName { id: String },

    #[error("{context} {name} is an array without declaring the collectionFormat")]
    MissingCollectionFormat { context: &'static str, name: String },

    #[error("Operation {method} {path} is missing a responses declaration")]
    MissingResponses { method: String, path: String },

    #[error("'in body' parameter {name} is missing a schema declaration")]
    MissingBodySchema { name: String },

    #[error("{context} {name} is an array without declaring the type of its items")]
    MissingItemType { context: &'static str, name: String },

    #[error("{method} {path} references a model definition that does not have a title member")]
    MissingTitle { method: String, path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SpecError {
    /// True for errors raised because the document broke a structural rule,
    /// as opposed to failing to read or decode it
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SpecError::MissingInfoTitle { .. }
                | SpecError::MissingOperationName { .. }
                | SpecError::MissingCollectionFormat { .. }
                | SpecError::MissingResponses { .. }
                | SpecError::MissingBodySchema { .. }
                | SpecError::MissingItemType { .. }
                | SpecError::MissingTitle { .. }
        )
    }
}

/// Result type for specification loading
pub type Result<T> = std::result::Result<T, SpecError>;

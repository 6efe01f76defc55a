//! Swagger 2.0 document parser

use super::types::SwaggerSpec;
use crate::document::ApiDocument;
use crate::loader::{value_from_str, value_from_yaml};
use crate::reference::expand_refs;
use apidox_common::{Result, SpecError, Specification};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Swagger 2.0 parser
///
/// Local references are expanded before the document is decoded, so every
/// schema handed to the builder is self-contained.
pub struct SwaggerParser {
    /// Decoded document
    spec: SwaggerSpec,

    /// Location the document was loaded from
    url: String,
}

impl SwaggerParser {
    /// Load a Swagger document from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SpecError::Parse(format!(
                "Failed to read Swagger file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_text(&content, &path.display().to_string())
    }

    /// Parse a Swagger document from JSON or YAML text
    pub fn from_text(content: &str, url: &str) -> Result<Self> {
        Self::from_value(value_from_str(content, url)?, url)
    }

    /// Parse a Swagger document from JSON text
    pub fn from_json(json: &str, url: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SpecError::Parse(format!("Failed to parse Swagger JSON: {}", e)))?;
        Self::from_value(value, url)
    }

    /// Parse a Swagger document from YAML text
    pub fn from_yaml(yaml: &str, url: &str) -> Result<Self> {
        Self::from_value(value_from_yaml(yaml, url)?, url)
    }

    /// Decode an already parsed document tree
    pub fn from_value(mut value: Value, url: &str) -> Result<Self> {
        expand_refs(&mut value);

        let spec: SwaggerSpec = serde_json::from_value(value)
            .map_err(|e| SpecError::Parse(format!("Invalid Swagger document {}: {}", url, e)))?;

        Ok(Self {
            spec,
            url: url.to_string(),
        })
    }

    /// Neutral form of the document
    pub fn document(&self) -> Result<ApiDocument> {
        super::converter::convert_swagger_to_document(&self.spec, &self.url)
    }

    /// Build the documentation model
    pub fn parse(&self) -> Result<Specification> {
        crate::builder::build(&self.document()?)
    }

    /// Get reference to the underlying Swagger document
    pub fn spec(&self) -> &SwaggerSpec {
        &self.spec
    }
}

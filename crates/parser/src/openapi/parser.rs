//! OpenAPI document parser

use super::types::OpenApiSpec;
use crate::document::ApiDocument;
use crate::loader::{value_from_str, value_from_yaml};
use crate::reference::expand_refs;
use apidox_common::{Result, SpecError, Specification};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// OpenAPI 3.x parser
pub struct OpenApiParser {
    /// Decoded document
    spec: OpenApiSpec,

    /// Location the document was loaded from
    url: String,
}

impl OpenApiParser {
    /// Load an OpenAPI document from a JSON or YAML file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("petstore.yaml")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SpecError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_text(&content, &path.display().to_string())
    }

    /// Parse an OpenAPI document from JSON or YAML text
    pub fn from_text(content: &str, url: &str) -> Result<Self> {
        Self::from_value(value_from_str(content, url)?, url)
    }

    /// Parse an OpenAPI document from JSON text
    pub fn from_json(json: &str, url: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SpecError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Self::from_value(value, url)
    }

    /// Parse a OpenAPI document from YAML text
    pub fn from_yaml(yaml: &str, url: &str) -> Result<Self> {
        Self::from_value(value_from_yaml(yaml, url)?, url)
    }

    /// Decode an already parsed document tree
    pub fn from_value(mut value: Value, url: &str) -> Result<Self> {
        expand_refs(&mut value);

        let spec: OpenApiSpec = serde_json::from_value(value)
            .map_err(|e| SpecError::Parse(format!("Invalid OpenAPI document {}: {}", url, e)))?;

        Ok(Self {
            spec,
            url: url.to_string(),
        })
    }

    /// Neutral form of the document
    pub fn document(&self) -> Result<ApiDocument> {
        super::converter::convert_openapi_to_document(&self.spec, &self.url)
    }

    /// Build the documentation model
    pub fn parse(&self) -> Result<Specification> {
        crate::builder::build(&self.document()?)
    }

    /// Get reference to the underlying OpenAPI document
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }
}

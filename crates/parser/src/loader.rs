//! Document loading and the specification suite
//!
//! Reads documents through a [`DocumentSource`], detects their dialect and
//! builds one [`Specification`] per document, or a single shared one in
//! collapse mode.

use crate::document::ApiDocument;
use crate::openapi::OpenApiParser;
use crate::swagger::SwaggerParser;
use apidox_common::{Result, SpecError, Specification, SuiteConfig};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Document dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Swagger 2.x
    Swagger2,

    /// OpenAPI 3.x
    OpenApi3,
}

/// Decode document text, JSON or YAML
///
/// Text is treated as JSON when `url` ends in `.json` or the text starts with
/// `{`; anything else is decoded as YAML.
pub fn value_from_str(content: &str, url: &str) -> Result<Value> {
    if url.ends_with(".json") || content.trim_start().starts_with('{') {
        serde_json::from_str(content)
            .map_err(|e| SpecError::Parse(format!("Failed to parse JSON from {}: {}", url, e)))
    } else {
        value_from_yaml(content, url)
    }
}

/// Decode YAML text into a JSON tree
///
/// Non-string mapping keys (such as response status codes written as bare
/// integers) become strings.
pub fn value_from_yaml(content: &str, url: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| SpecError::Parse(format!("Failed to parse YAML from {}: {}", url, e)))?;
    serde_json::to_value(yaml)
        .map_err(|e| SpecError::Parse(format!("Failed to convert YAML from {}: {}", url, e)))
}

/// Identify the dialect of a decoded document
pub fn detect_dialect(value: &Value, url: &str) -> Result<Dialect> {
    if value.get("openapi").is_some() {
        Ok(Dialect::OpenApi3)
    } else if value.get("swagger").is_some() {
        Ok(Dialect::Swagger2)
    } else {
        Err(SpecError::UnknownDialect(url.to_string()))
    }
}

/// Where document text comes from
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource {
    /// Fetch the text of the document at `location`
    fn fetch(&self, location: &str) -> Result<String>;
}

/// Reads documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl DocumentSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String> {
        fs::read_to_string(location).map_err(|e| {
            SpecError::Parse(format!("Failed to read document {}: {}", location, e))
        })
    }
}

/// Fetch, decode and project one document into neutral form
pub fn load_document(source: &dyn DocumentSource, location: &str) -> Result<ApiDocument> {
    let content = source.fetch(location)?;
    let value = value_from_str(&content, location)?;

    match detect_dialect(&value, location)? {
        Dialect::Swagger2 => SwaggerParser::from_value(value, location)?.document(),
        Dialect::OpenApi3 => OpenApiParser::from_value(value, location)?.document(),
    }
}

/// Loaded specifications, keyed by specification id
pub struct ApiSuite {
    source: Box<dyn DocumentSource>,
    specifications: BTreeMap<String, Specification>,

    /// Load every document into one shared specification
    collapse: bool,
}

impl ApiSuite {
    pub fn new(source: Box<dyn DocumentSource>, collapse: bool) -> Self {
        Self {
            source,
            specifications: BTreeMap::new(),
            collapse,
        }
    }

    /// Suite reading from the filesystem
    pub fn with_files(collapse: bool) -> Self {
        Self::new(Box::new(FileSource), collapse)
    }

    /// Load every document named by a suite configuration
    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        let mut suite = Self::with_files(config.collapse);
        for path in &config.specs {
            suite.load(&path_location(path))?;
        }
        Ok(suite)
    }

    /// Load one document
    ///
    /// Returns the id of the specification the document was loaded into.
    /// A failure leaves previously loaded specifications untouched.
    pub fn load(&mut self, location: &str) -> Result<String> {
        let doc = load_document(self.source.as_ref(), location)?;

        if self.collapse {
            if let Some(existing) = self.specifications.values().next() {
                // Merged on a copy; the aggregate is only replaced on success
                let id = existing.id.clone();
                let mut merged = existing.clone();
                crate::builder::load_into(&mut merged, &doc)?;
                info!(id = %id, url = location, "Collapsed document into specification");
                self.specifications.insert(id.clone(), merged);
                return Ok(id);
            }
        }

        let spec = crate::builder::build(&doc)?;
        let id = spec.id.clone();
        if self.specifications.contains_key(&id) {
            warn!(id = %id, url = location, "Replacing specification with the same id");
        }
        info!(
            id = %id,
            groups = spec.groups.len(),
            resources = spec.resources.len(),
            "Loaded specification"
        );
        self.specifications.insert(id.clone(), spec);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&Specification> {
        self.specifications.get(id)
    }

    pub fn specifications(&self) -> impl Iterator<Item = &Specification> {
        self.specifications.values()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapse
    }

    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }
}

fn path_location(path: &Path) -> String {
    path.display().to_string()
}

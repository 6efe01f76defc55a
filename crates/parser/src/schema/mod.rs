//! Dialect-neutral schema representation and resource resolution
//!
//! Both dialect adapters project their native schema trees into
//! [`SchemaNode`]; a single resolver then walks that tree to produce
//! [`Resource`](apidox_common::Resource) nodes and example payloads.
//!
//! ## Walk
//!
//! - [`classify`] decides the type pair of a node and which node to descend
//!   into when `items` are declared
//! - [`resolve`] names the resource, tracks its namespace path and builds it
//! - the property compiler folds each declared property (and every `allOf`
//!   part) into the parent resource and example

mod classify;
mod properties;
mod resolver;

pub use classify::{classify, classify_map_entry, Classified};
pub use resolver::{resolve, Resolved};

use indexmap::IndexMap;
use serde_json::Value;

/// Placeholder property name used for `additionalProperties` entries
pub const MAP_KEY: &str = "<key>";

/// Schema node in dialect-neutral form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    /// Declared `type`; `None` means an object
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,

    /// Element schema of an array
    pub items: Option<Box<SchemaNode>>,

    /// Declared properties, in document order
    pub properties: IndexMap<String, SchemaNode>,

    pub required: Vec<String>,

    /// Value schema for arbitrary extra keys
    pub additional_properties: Option<Box<SchemaNode>>,

    /// Composed schemas, merged additively
    pub all_of: Vec<SchemaNode>,

    pub enum_values: Vec<Value>,
    pub example: Option<Value>,
    pub read_only: bool,

    /// `x-excludeFromOperations`
    pub exclude_from_operations: Vec<String>,
}

impl SchemaNode {
    /// Shorthand for a bare typed node
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_property(mut self, name: &str, node: SchemaNode) -> Self {
        self.properties.insert(name.to_string(), node);
        self
    }

    pub fn with_items(mut self, node: SchemaNode) -> Self {
        self.items = Some(Box::new(node));
        self
    }

    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required.extend(names.iter().map(|n| n.to_string()));
        self
    }
}

/// Operation-level facts a resolution needs
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Lower-case HTTP verb, for error reporting
    pub verb: &'a str,
    pub path: &'a str,

    /// Name matched against `x-excludeFromOperations`
    pub operation_name: &'a str,

    /// Resolving a request body: read-only and excluded properties are dropped
    pub request: bool,

    /// A property's name overrides its schema title
    pub property_titles: bool,
}

/// How a node is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRole {
    Schema,
    MapEntry,
}

//! OpenAPI 3.x document adapter
//!
//! Decodes OpenAPI 3.x documents (JSON or YAML) and projects them into the
//! neutral [`ApiDocument`](crate::document::ApiDocument) form.
//!
//! ## Mapping
//! - the first server URL is the API base URL
//! - a request body becomes a `body` parameter using its first media type
//! - a response uses the schema of its first media type
//! - parameter `style`/`explode` map onto the equivalent collection format
//! - an untitled schema expanded from a component is named after it
//!
//! ## Usage
//! ```rust,ignore
//! use apidox_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("petstore.yaml")?;
//! let specification = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use parser::OpenApiParser;
pub use types::*;

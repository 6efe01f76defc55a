//! Swagger 2.0 document adapter
//!
//! Decodes Swagger 2.0 documents (JSON or YAML) and projects them into the
//! neutral [`ApiDocument`](crate::document::ApiDocument) form.
//!
//! ## Recognised extensions
//! - `x-navigateMethodsByName`, `x-sortMethodsBy` on the document
//! - `x-version`, `x-pathName` on a path item
//! - `x-operationName` on an operation
//! - `x-excludeFromOperations` on a schema property
//!
//! ## Usage
//! ```rust,ignore
//! use apidox_parser::swagger::SwaggerParser;
//!
//! let parser = SwaggerParser::from_file("petstore.json")?;
//! let specification = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use converter::convert_schema;
pub(crate) use converter::{convert_info, convert_requirement, convert_tag, project_schema};
pub use parser::SwaggerParser;
pub use types::*;

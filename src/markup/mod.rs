//! Markup module - Parse indented YAML-style markup into a node tree
//!
//! Supported input:
//! - `key: "value"` scalar fields (single or double quotes, `\` escapes)
//! - `key:` followed by deeper-indented fields
//! - `- ` list markers, `#` comments outside quotes
//! - `&name` anchors, `*name` aliases and `<<: *name` merge keys

pub mod classify;
pub mod error;
pub mod lines;
pub mod node;
pub mod parse;
pub mod registry;
pub mod scalar;

#[allow(unused_imports)]
pub use error::{ErrorCategory, MarkupError};
pub use node::{MarkupNode, NodeBody};
#[allow(unused_imports)]
pub use parse::{parse, parse_document, parse_with, Document, ParseOptions};

//! HTML module - Transpile markup trees to HTML and serialize them
//!
//! Recognized keys:
//! - `children`: its fields become child elements of the enclosing element
//! - `raw`: content emitted as text with no wrapping tag
//! - `innerText`: element text alongside sibling attributes

pub mod node;
pub mod serialize;
pub mod transpile;

pub use node::HtmlNode;
pub use serialize::render;
pub use transpile::transpile;

use crate::markup::{parse_with, MarkupError, ParseOptions};

/// Parse markup text and render it as an HTML fragment
pub fn markup_to_html(text: &str, options: &ParseOptions) -> Result<String, MarkupError> {
    let nodes = parse_with(text, options)?;
    Ok(render(&nodes))
}

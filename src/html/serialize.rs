//! HTML text output
//!
//! No escaping and no void-element handling: every element gets an explicit
//! closing tag, and attributes always land in the opening tag whatever their
//! position among the element's children.

use std::fmt;

use crate::html::node::{Attribute, Element};
use crate::html::{transpile, HtmlNode};
use crate::markup::MarkupNode;

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlNode::Text(text) => f.write_str(text),
            HtmlNode::Attribute(attribute) => attribute.fmt(f),
            HtmlNode::Element(element) => element.fmt(f),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for child in self.children.iter().filter(|c| c.is_attribute()) {
            write!(f, " {}", child)?;
        }
        f.write_str(">")?;
        for child in self.children.iter().filter(|c| !c.is_attribute()) {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Transpile and serialize top-level nodes, concatenated in document order
pub fn render(nodes: &[MarkupNode]) -> String {
    nodes
        .iter()
        .map(|node| transpile(node).to_string())
        .collect()
}

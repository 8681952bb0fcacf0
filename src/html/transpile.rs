//! Markup to HTML transpilation
//!
//! A mapping always becomes an element. A scalar becomes an element, bare
//! text or an attribute depending on where it sits:
//!
//! - at the top level or directly under `children:` it is an element
//!   (`raw` emits bare text instead)
//! - anywhere else it is a field of the enclosing element: an attribute,
//!   or the element's text for `innerText`

use crate::html::node::HtmlNode;
use crate::markup::{MarkupNode, NodeBody};

/// Key whose mapping lists child elements instead of attributes
pub const CHILDREN_KEY: &str = "children";

/// Key whose content is emitted as literal text with no tag
pub const RAW_KEY: &str = "raw";

/// Key that sets an element's text next to its attributes
pub const INNER_TEXT_KEY: &str = "innerText";

/// Where a markup node sits relative to the HTML being built
///
/// Only the immediate enclosing markup key matters, so copies spliced in by
/// aliases and merge keys pick up the context of the site they appear at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<'a> {
    /// A top-level node with no destination parent
    Root,
    /// Nested under the markup node with this key
    Within(&'a str),
}

impl Position<'_> {
    /// Whether a scalar here produces an element rather than an attribute
    pub fn is_html_position(&self) -> bool {
        match self {
            Position::Root => true,
            Position::Within(enclosing) => *enclosing == CHILDREN_KEY,
        }
    }
}

/// Transpile a top-level markup node
pub fn transpile(node: &MarkupNode) -> HtmlNode {
    transpile_at(node, Position::Root)
}

/// Transpile a markup node at a given position
pub fn transpile_at(node: &MarkupNode, position: Position<'_>) -> HtmlNode {
    match &node.body {
        NodeBody::Raw { content } => transpile_raw(&node.key, content, position),
        NodeBody::Children { children } => transpile_children(&node.key, children),
    }
}

fn transpile_raw(key: &str, content: &str, position: Position<'_>) -> HtmlNode {
    if !position.is_html_position() {
        return if key == INNER_TEXT_KEY {
            HtmlNode::text(content)
        } else {
            HtmlNode::attribute(key, content)
        };
    }

    let text = HtmlNode::text(content);
    if key == RAW_KEY {
        return text;
    }

    HtmlNode::element(key, vec![text])
}

fn transpile_children(key: &str, children: &[MarkupNode]) -> HtmlNode {
    let mut html_children = Vec::with_capacity(children.len());

    for child in children {
        match &child.body {
            NodeBody::Children { children: scoped } if child.key == CHILDREN_KEY => {
                html_children.extend(
                    scoped
                        .iter()
                        .map(|grandchild| transpile_at(grandchild, Position::Within(CHILDREN_KEY))),
                );
            }
            _ => html_children.push(transpile_at(child, Position::Within(key))),
        }
    }

    HtmlNode::element(key, html_children)
}

//! Markup node tree

use serde::Serialize;

/// One parsed field: a scalar or a nested mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupNode {
    pub key: String,

    /// Anchor declared on this node with `&name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    #[serde(flatten)]
    pub body: NodeBody,
}

/// Payload of a markup node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeBody {
    /// `key: "content"`
    Raw { content: String },
    /// `key:` followed by nested fields
    Children { children: Vec<MarkupNode> },
}

impl MarkupNode {
    pub fn raw(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            anchor: None,
            body: NodeBody::Raw {
                content: content.into(),
            },
        }
    }

    pub fn children(key: impl Into<String>, children: Vec<MarkupNode>) -> Self {
        Self {
            key: key.into(),
            anchor: None,
            body: NodeBody::Children { children },
        }
    }

    #[allow(dead_code)]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    #[allow(dead_code)]
    pub fn is_raw(&self) -> bool {
        matches!(self.body, NodeBody::Raw { .. })
    }

    /// Nested fields, empty for a raw node
    pub fn child_nodes(&self) -> &[MarkupNode] {
        match &self.body {
            NodeBody::Children { children } => children,
            NodeBody::Raw { .. } => &[],
        }
    }

    /// Scalar content, `None` for a mapping
    #[allow(dead_code)]
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Raw { content } => Some(content),
            NodeBody::Children { .. } => None,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn count(&self) -> usize {
        1 + self.child_nodes().iter().map(MarkupNode::count).sum::<usize>()
    }

    /// Levels in this subtree, 1 for a raw node
    pub fn height(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(MarkupNode::height)
            .max()
            .unwrap_or(0)
    }
}

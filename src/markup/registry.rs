//! Anchor registry for one parse call

use std::collections::HashMap;

use crate::markup::node::MarkupNode;

/// A registered node with its subtree measured once
#[derive(Debug, Clone)]
pub struct Anchor {
    pub node: MarkupNode,
    /// Levels in the subtree, 1 for a raw node
    pub height: usize,
    /// Nodes in the subtree, including the root
    pub size: usize,
}

/// Anchors declared so far, in document order
///
/// A node is registered only once its own subtree is fully parsed, so
/// references can never see an anchor declared later in the text.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    anchors: HashMap<String, Anchor>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished node under its anchor name
    ///
    /// A later declaration of the same name replaces the earlier one.
    pub fn register(&mut self, name: &str, node: &MarkupNode) {
        let anchor = Anchor {
            node: node.clone(),
            height: node.height(),
            size: node.count(),
        };
        if self.anchors.insert(name.to_string(), anchor).is_some() {
            tracing::debug!(anchor = name, "anchor redeclared, later references use the new node");
        } else {
            tracing::debug!(anchor = name, key = %node.key, "anchor registered");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Anchor> {
        self.anchors.get(name)
    }

    /// Declared names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.anchors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = AnchorRegistry::new();
        assert!(registry.is_empty());

        registry.register("a", &MarkupNode::raw("tag", "value"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").and_then(|a| a.node.content()), Some("value"));
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_redeclare_replaces() {
        let mut registry = AnchorRegistry::new();
        registry.register("a", &MarkupNode::raw("first", "1"));
        registry.register("a", &MarkupNode::raw("second", "2"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").map(|a| a.node.key.as_str()), Some("second"));
    }

    #[test]
    fn test_register_measures_subtree() {
        let mut registry = AnchorRegistry::new();
        let nav = MarkupNode::children(
            "nav",
            vec![
                MarkupNode::children("ul", vec![MarkupNode::raw("li", "a")]),
                MarkupNode::raw("id", "menu"),
            ],
        );
        registry.register("nav", &nav);

        let anchor = registry.get("nav").unwrap();
        assert_eq!(anchor.height, 3);
        assert_eq!(anchor.size, 4);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = AnchorRegistry::new();
        registry.register("nav", &MarkupNode::raw("a", "1"));
        registry.register("footer", &MarkupNode::raw("b", "2"));
        registry.register("nav", &MarkupNode::raw("c", "3"));

        assert_eq!(registry.names(), vec!["footer".to_string(), "nav".to_string()]);
    }
}

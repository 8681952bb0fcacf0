//! Tree builder
//!
//! Turns significant lines into a forest of [`MarkupNode`]s. Each group is
//! classified, its fields extracted and its continuation lines regrouped
//! recursively. Aliases and merge keys are resolved against the anchors
//! registered earlier in the same document.

use crate::markup::classify::{classify, GroupKind};
use crate::markup::error::MarkupError;
use crate::markup::lines::{collect_groups, significant_lines, Line};
use crate::markup::node::{MarkupNode, NodeBody};
use crate::markup::registry::{Anchor, AnchorRegistry};
use crate::markup::scalar::{alias_target, extract_anchor, extract_raw_content, has_quote, parse_key};

/// Default limit on group nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on nodes built for one document, alias copies included
pub const DEFAULT_MAX_NODES: usize = 100_000;

/// Knobs for a parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed group level; top-level groups are level 0.
    /// Also bounds how deep alias and merge-key copies may reach.
    pub max_depth: usize,

    /// Most nodes one document may build, counting every alias copy
    pub max_nodes: usize,

    /// Whether `key: &name ...` nodes also appear in the output tree.
    /// When off they are only registered for later `*name` / `<<: *name`.
    pub keep_anchor_declarations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            keep_anchor_declarations: true,
        }
    }
}

/// Parse markup text with default options
#[allow(dead_code)]
pub fn parse(text: &str) -> Result<Vec<MarkupNode>, MarkupError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse markup text into top-level nodes
///
/// Blank and comment-only input yields an empty forest.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Vec<MarkupNode>, MarkupError> {
    parse_document(text, options).map(|document| document.nodes)
}

/// A parsed file: its top-level nodes and the anchor names it declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<MarkupNode>,
    pub anchors: Vec<String>,
}

/// Parse markup text, keeping the declared anchor names
///
/// The anchor registry lives for this call only.
pub fn parse_document(text: &str, options: &ParseOptions) -> Result<Document, MarkupError> {
    let lines = significant_lines(text);
    let groups = collect_groups(&lines)?;

    let mut builder = TreeBuilder::new(options);
    let mut nodes = Vec::with_capacity(groups.len());

    for group in groups {
        nodes.extend(builder.parse_group(group, 0)?);
    }

    tracing::debug!(
        nodes = nodes.len(),
        built = builder.budget.used,
        anchors = builder.registry.len(),
        "parsed markup"
    );

    Ok(Document {
        nodes,
        anchors: builder.registry.names(),
    })
}

/// Running count of built nodes against `max_nodes`
struct NodeBudget {
    used: usize,
    limit: usize,
}

impl NodeBudget {
    fn spend(&mut self, line: usize, nodes: usize) -> Result<(), MarkupError> {
        self.used = self.used.saturating_add(nodes);
        if self.used > self.limit {
            return Err(MarkupError::NodeLimitExceeded {
                line,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    registry: AnchorRegistry,
    budget: NodeBudget,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            registry: AnchorRegistry::new(),
            budget: NodeBudget {
                used: 0,
                limit: options.max_nodes,
            },
        }
    }

    /// Parse one group into the nodes it contributes to its parent
    ///
    /// Merge keys can contribute any number of nodes, and an anchor
    /// declaration contributes none when declarations are not kept.
    fn parse_group(
        &mut self,
        group: &[Line<'_>],
        depth: usize,
    ) -> Result<Vec<MarkupNode>, MarkupError> {
        let definition = group.first().ok_or(MarkupError::EmptyGroup)?;

        if depth >= self.options.max_depth {
            return Err(MarkupError::DepthExceeded {
                line: definition.number,
                limit: self.options.max_depth,
            });
        }

        match classify(group)? {
            GroupKind::Raw => {
                let node = self.parse_raw(group)?;
                Ok(self.declare(node))
            }
            GroupKind::Children => {
                let node = self.parse_children(group, depth)?;
                Ok(self.declare(node))
            }
            GroupKind::Alias => Ok(vec![self.parse_alias(group, depth)?]),
            GroupKind::Override => self.parse_override(group, depth),
        }
    }

    fn parse_raw(&mut self, group: &[Line<'_>]) -> Result<MarkupNode, MarkupError> {
        let definition = &group[0];
        self.budget.spend(definition.number, 1)?;

        if group.len() > 1 && has_quote(definition.text) {
            return Err(MarkupError::NestedScalar {
                line: definition.number,
                text: definition.text.to_string(),
            });
        }

        let (text, anchor) = extract_anchor(definition.text);
        let key = parse_key(definition, &text)?;
        let content = extract_raw_content(definition, &text)?;

        Ok(MarkupNode {
            anchor,
            ..MarkupNode::raw(key, content)
        })
    }

    fn parse_children(
        &mut self,
        group: &[Line<'_>],
        depth: usize,
    ) -> Result<MarkupNode, MarkupError> {
        let definition = &group[0];
        self.budget.spend(definition.number, 1)?;
        let (text, anchor) = extract_anchor(definition.text);
        let key = parse_key(definition, &text)?;

        let mut children = Vec::new();
        for child_group in collect_groups(&group[1..])? {
            children.extend(self.parse_group(child_group, depth + 1)?);
        }

        Ok(MarkupNode {
            anchor,
            ..MarkupNode::children(key, children)
        })
    }

    /// `key: *name` becomes a mapping `key` holding a copy of the anchored node
    fn parse_alias(
        &mut self,
        group: &[Line<'_>],
        depth: usize,
    ) -> Result<MarkupNode, MarkupError> {
        let definition = &group[0];
        let key = parse_key(definition, definition.text)?;
        let target = resolve(&self.registry, definition)?;

        // the copy sits one level below `key`
        check_copy_depth(self.options, definition, depth + target.height)?;
        self.budget.spend(definition.number, 1 + target.size)?;

        if group.len() > 1 {
            tracing::warn!(
                line = definition.number,
                "lines nested under an alias are ignored"
            );
        }

        Ok(MarkupNode::children(key, vec![target.node.clone()]))
    }

    /// `<<: *name` splices copies of the anchored mapping's fields
    fn parse_override(
        &mut self,
        group: &[Line<'_>],
        depth: usize,
    ) -> Result<Vec<MarkupNode>, MarkupError> {
        let definition = &group[0];
        let target = resolve(&self.registry, definition)?;

        match &target.node.body {
            NodeBody::Children { children } => {
                // fields land at this group's level, one above their old parent
                let deepest = (depth + target.height).saturating_sub(2);
                check_copy_depth(self.options, definition, deepest)?;
                self.budget.spend(definition.number, target.size - 1)?;

                tracing::debug!(
                    line = definition.number,
                    fields = children.len(),
                    "merged anchor fields"
                );
                Ok(children.clone())
            }
            NodeBody::Raw { .. } => Err(MarkupError::OverrideNotMapping {
                line: definition.number,
                name: alias_target(definition.text).unwrap_or_default().to_string(),
            }),
        }
    }

    /// Register a finished node if it declares an anchor
    fn declare(&mut self, node: MarkupNode) -> Vec<MarkupNode> {
        if let Some(name) = &node.anchor {
            self.registry.register(name, &node);
            if !self.options.keep_anchor_declarations {
                return Vec::new();
            }
        }
        vec![node]
    }
}

fn resolve<'r>(
    registry: &'r AnchorRegistry,
    definition: &Line<'_>,
) -> Result<&'r Anchor, MarkupError> {
    let name = alias_target(definition.text).unwrap_or_default();
    registry.get(name).ok_or_else(|| MarkupError::UnknownAnchor {
        line: definition.number,
        name: name.to_string(),
    })
}

/// Reject a copy whose deepest node would sit at or past the depth limit
fn check_copy_depth(
    options: &ParseOptions,
    definition: &Line<'_>,
    deepest: usize,
) -> Result<(), MarkupError> {
    if deepest >= options.max_depth {
        return Err(MarkupError::DepthExceeded {
            line: definition.number,
            limit: options.max_depth,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"head:
  children:
    - title: "Stupid YAML Website"
    - link:
      rel: "stylesheet"
      type: "text/css"
      href: "/static/style.css"
body:
  children:
    - h1:
        class: "title"
        text: "Welcome to the Stupid YAML Website"
    - p: "The template is written in YAML like God intended"
"#;

    #[test]
    fn test_parse_double_quote_raw() {
        let nodes = parse("tag: \"value\"").unwrap();
        assert_eq!(nodes, vec![MarkupNode::raw("tag", "value")]);
    }

    #[test]
    fn test_parse_single_quote_raw() {
        let nodes = parse("tag: 'value'").unwrap();
        assert_eq!(nodes, vec![MarkupNode::raw("tag", "value")]);
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let nodes = parse(r#"tag: "value \"with escaped quotes\"""#).unwrap();
        assert_eq!(nodes[0].content(), Some("value \"with escaped quotes\""));
    }

    #[test]
    fn test_parse_simple_children() {
        let nodes = parse("tag:\n  child: \"value\"").unwrap();
        assert_eq!(
            nodes,
            vec![MarkupNode::children(
                "tag",
                vec![MarkupNode::raw("child", "value")]
            )]
        );
    }

    #[test]
    fn test_parse_nested_children_with_comment() {
        let text = "tag:\n  child:\n    - nested1: \"value\" # ignored by the parser\n    - nested2: \"value\"\n";
        let nodes = parse(text).unwrap();
        assert_eq!(
            nodes,
            vec![MarkupNode::children(
                "tag",
                vec![MarkupNode::children(
                    "child",
                    vec![
                        MarkupNode::raw("nested1", "value"),
                        MarkupNode::raw("nested2", "value"),
                    ]
                )]
            )]
        );
    }

    #[test]
    fn test_parse_document() {
        let nodes = parse(DOCUMENT).unwrap();
        assert_eq!(nodes.len(), 2);

        let head = &nodes[0];
        assert_eq!(head.key, "head");
        let scope = &head.child_nodes()[0];
        assert_eq!(scope.key, "children");
        assert_eq!(scope.child_nodes()[0], MarkupNode::raw("title", "Stupid YAML Website"));
        assert_eq!(
            scope.child_nodes()[1],
            MarkupNode::children(
                "link",
                vec![
                    MarkupNode::raw("rel", "stylesheet"),
                    MarkupNode::raw("type", "text/css"),
                    MarkupNode::raw("href", "/static/style.css"),
                ]
            )
        );

        let body_scope = &nodes[1].child_nodes()[0];
        assert_eq!(body_scope.child_nodes()[0].key, "h1");
        assert_eq!(body_scope.child_nodes()[0].child_nodes().len(), 2);
        assert_eq!(
            body_scope.child_nodes()[1],
            MarkupNode::raw("p", "The template is written in YAML like God intended")
        );
    }

    #[test]
    fn test_parse_empty_and_comment_only() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n  \n# just a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_raw_with_anchor_is_kept_and_named() {
        let nodes = parse("tag: &anchor \"value\"").unwrap();
        assert_eq!(nodes, vec![MarkupNode::raw("tag", "value").with_anchor("anchor")]);
    }

    #[test]
    fn test_children_with_anchor_is_kept_and_named() {
        let nodes = parse("tag: &anchor\n  child: \"value\"").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::children("tag", vec![MarkupNode::raw("child", "value")])
                    .with_anchor("anchor")
            ]
        );
    }

    #[test]
    fn test_ampersand_in_quoted_text_declares_anchor() {
        let nodes = parse("p: \"Tom &amp; Jerry\"").unwrap();
        assert_eq!(nodes, vec![MarkupNode::raw("p", "Tom  Jerry").with_anchor("amp;")]);

        let options = ParseOptions {
            keep_anchor_declarations: false,
            ..ParseOptions::default()
        };
        assert!(parse_with("p: \"Tom &amp; Jerry\"", &options).unwrap().is_empty());

        assert!(matches!(
            parse("p: \"a&b\""),
            Err(MarkupError::UnterminatedQuote { line: 1, .. })
        ));
    }

    #[test]
    fn test_anchor_declarations_hidden_in_template_mode() {
        let options = ParseOptions {
            keep_anchor_declarations: false,
            ..ParseOptions::default()
        };
        let nodes = parse_with("tag: &anchor \"value\"\nref: *anchor\n", &options).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "ref");
    }

    #[test]
    fn test_alias_wraps_copy_of_raw_anchor() {
        let nodes = parse("tag: &anchor \"value\"\nref: *anchor\n").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes[1],
            MarkupNode::children(
                "ref",
                vec![MarkupNode::raw("tag", "value").with_anchor("anchor")]
            )
        );
    }

    #[test]
    fn test_alias_wraps_copy_of_mapping_anchor() {
        let text = "nav: &nav\n  a: \"home\"\nfooter:\n  menu: *nav\n";
        let nodes = parse(text).unwrap();
        let menu = &nodes[1].child_nodes()[0];

        assert_eq!(menu.key, "menu");
        assert_eq!(menu.child_nodes().len(), 1);
        assert_eq!(menu.child_nodes()[0].key, "nav");
        assert_eq!(menu.child_nodes()[0].child_nodes()[0], MarkupNode::raw("a", "home"));
    }

    #[test]
    fn test_override_splices_fields() {
        let text = "base: &b\n  children:\n    - x: \"1\"\nother:\n  <<: *b\n";
        let nodes = parse(text).unwrap();
        let other = &nodes[1];

        assert_eq!(other.key, "other");
        assert_eq!(other.child_nodes().len(), 1);
        assert_eq!(
            other.child_nodes()[0],
            MarkupNode::children("children", vec![MarkupNode::raw("x", "1")])
        );
    }

    #[test]
    fn test_override_keeps_sibling_order() {
        let text = "attrs: &attrs\n  class: \"btn\"\n  role: \"button\"\na:\n  id: \"first\"\n  <<: *attrs\n  href: \"/\"\n";
        let nodes = parse(text).unwrap();
        let keys: Vec<&str> = nodes[1].child_nodes().iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "class", "role", "href"]);
    }

    #[test]
    fn test_override_of_raw_anchor_fails() {
        let text = "tag: &t \"value\"\nother:\n  <<: *t\n";
        let err = parse(text).unwrap_err();
        assert_eq!(
            err,
            MarkupError::OverrideNotMapping {
                line: 3,
                name: "t".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_anchor_fails() {
        let err = parse("ref: *missing").unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnknownAnchor {
                line: 1,
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_forward_reference_fails() {
        let err = parse("ref: *later\ntag: &later \"v\"\n").unwrap_err();
        assert!(matches!(err, MarkupError::UnknownAnchor { line: 1, .. }));
    }

    #[test]
    fn test_self_reference_fails() {
        let err = parse("a: &a\n  b: *a\n").unwrap_err();
        assert!(matches!(err, MarkupError::UnknownAnchor { line: 2, .. }));
    }

    #[test]
    fn test_alias_copy_is_independent() {
        let text = "tag: &anchor \"value\"\nref: *anchor\nagain: *anchor\n";
        let mut nodes = parse(text).unwrap();
        if let NodeBody::Raw { content } = &mut nodes[0].body {
            content.push_str(" changed");
        }
        assert_eq!(nodes[1].child_nodes()[0].content(), Some("value"));
        assert_eq!(nodes[2].child_nodes()[0].content(), Some("value"));
    }

    #[test]
    fn test_anchor_nested_in_subtree_is_visible_later() {
        let text = "a:\n  b: &inner \"x\"\nc: *inner\n";
        let nodes = parse(text).unwrap();
        assert_eq!(nodes[1].child_nodes()[0].content(), Some("x"));
    }

    #[test]
    fn test_syntax_errors_propagate() {
        assert!(matches!(
            parse("a:\n  b: \"unterminated\n"),
            Err(MarkupError::UnterminatedQuote { line: 2, .. })
        ));
        assert!(matches!(
            parse("a:\n  just text\n  b: \"x\"\n"),
            Err(MarkupError::UndeterminedNode { line: 2, .. })
        ));
    }

    #[test]
    fn test_single_key_without_value_fails() {
        assert!(matches!(
            parse("a: \"1\"\nempty:\n"),
            Err(MarkupError::UndeterminedNode { line: 2, .. })
        ));
    }

    #[test]
    fn test_quoted_scalar_with_nested_lines_fails() {
        assert!(matches!(
            parse("p: \"x\"\n  span: \"y\"\n"),
            Err(MarkupError::NestedScalar { line: 1, .. })
        ));
    }

    #[test]
    fn test_indentation_below_group_level_fails() {
        let err = parse("a:\n    b: \"1\"\n  c: \"2\"\n").unwrap_err();
        assert!(matches!(err, MarkupError::IndentBelowGroup { line: 3, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        assert!(parse_with("a:\n  b: \"x\"\n", &options).is_ok());

        let err = parse_with("a:\n  b:\n    c: \"x\"\n", &options).unwrap_err();
        assert_eq!(err, MarkupError::DepthExceeded { line: 3, limit: 2 });
    }

    #[test]
    fn test_deeply_nested_input_is_rejected_not_overflowed() {
        let mut text = String::new();
        for level in 0..500 {
            text.push_str(&" ".repeat(level));
            text.push_str("d:\n");
        }
        text.push_str(&" ".repeat(500));
        text.push_str("p: \"deep\"\n");

        let err = parse(&text).unwrap_err();
        assert!(matches!(err, MarkupError::DepthExceeded { limit, .. } if limit == DEFAULT_MAX_DEPTH));
    }

    /// `a0` holds one field; each later `aN` holds an alias of `aN-1`
    fn alias_chain(links: usize) -> String {
        let mut text = String::from("a0: &a0\n  p: \"x\"\n");
        for n in 1..links {
            text.push_str(&format!("a{n}: &a{n}\n  k: *a{}\n", n - 1));
        }
        text
    }

    #[test]
    fn test_alias_copy_counts_toward_depth() {
        let text = "a: &a\n  p: \"x\"\nb: *a\n";
        let options = |max_depth| ParseOptions {
            max_depth,
            ..ParseOptions::default()
        };

        assert!(parse_with(text, &options(3)).is_ok());
        let err = parse_with(text, &options(2)).unwrap_err();
        assert_eq!(err, MarkupError::DepthExceeded { line: 3, limit: 2 });
    }

    #[test]
    fn test_alias_chain_is_rejected_not_overflowed() {
        let err = parse(&alias_chain(200)).unwrap_err();
        assert!(matches!(err, MarkupError::DepthExceeded { limit, .. } if limit == DEFAULT_MAX_DEPTH));

        let nodes = parse(&alias_chain(20)).unwrap();
        let deepest = nodes.iter().map(MarkupNode::height).max().unwrap();
        assert!(deepest <= DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_merged_fields_count_toward_depth() {
        let text = "base: &b\n  x:\n    y: \"1\"\nouter:\n  inner:\n    <<: *b\n";
        let options = |max_depth| ParseOptions {
            max_depth,
            ..ParseOptions::default()
        };

        let nodes = parse_with(text, &options(4)).unwrap();
        assert_eq!(nodes[1].child_nodes()[0].child_nodes()[0].key, "x");
        let err = parse_with(text, &options(3)).unwrap_err();
        assert_eq!(err, MarkupError::DepthExceeded { line: 6, limit: 3 });
    }

    #[test]
    fn test_node_limit_counts_alias_copies() {
        let text = "a: &a\n  p: \"1\"\n  q: \"2\"\nb: *a\n";
        let options = |max_nodes| ParseOptions {
            max_nodes,
            ..ParseOptions::default()
        };

        // three declared nodes plus the wrapper and its three copied nodes
        assert!(parse_with(text, &options(7)).is_ok());
        let err = parse_with(text, &options(6)).unwrap_err();
        assert_eq!(err, MarkupError::NodeLimitExceeded { line: 4, limit: 6 });
    }

    #[test]
    fn test_doubling_merges_hit_node_limit() {
        let mut text = String::from("l0: &l0\n  a: \"x\"\n  b: \"y\"\n");
        for n in 1..40 {
            text.push_str(&format!("l{n}: &l{n}\n  <<: *l{p}\n  <<: *l{p}\n", p = n - 1));
        }

        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            MarkupError::NodeLimitExceeded { limit, .. } if limit == DEFAULT_MAX_NODES
        ));
    }

    #[test]
    fn test_tabs_count_as_four_columns() {
        let nodes = parse("div:\n\tp: \"a\"\n    span: \"b\"\n").unwrap();
        assert_eq!(nodes[0].child_nodes().len(), 2);
    }

    #[test]
    fn test_parse_document_lists_declared_anchors() {
        let text = "nav: &nav \"x\"\nfoot: &foot\n  p: \"y\"\nuse: *nav\n";
        let document = parse_document(text, &ParseOptions::default()).unwrap();

        assert_eq!(document.nodes.len(), 3);
        assert_eq!(document.anchors, vec!["foot".to_string(), "nav".to_string()]);
    }
}

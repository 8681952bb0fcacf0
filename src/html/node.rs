//! HTML node tree

/// A node of the generated HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Literal text, emitted unescaped
    Text(String),
    Element(Element),
    /// `name="value"` on the enclosing element
    Attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<HtmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl HtmlNode {
    pub fn text(text: impl Into<String>) -> Self {
        HtmlNode::Text(text.into())
    }

    pub fn element(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Element(Element {
            tag: tag.into(),
            children,
        })
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        HtmlNode::Attribute(Attribute {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, HtmlNode::Attribute(_))
    }
}

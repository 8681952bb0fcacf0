//! Unified Result Model
//!
//! `check` and `build` report what they did as a ResultSet before rendering
//! it in the selected output format.

use serde::{Deserialize, Serialize};

use crate::markup::MarkupError;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A template that parsed cleanly
    Template,
    /// An HTML page written by a build
    Page,
    /// A static file copied by a build
    Asset,
    Error,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

impl RangeLine {
    pub fn line(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3 or SHA1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl ResultError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&MarkupError> for ResultError {
    fn from(err: &MarkupError) -> Self {
        ResultError::new(err.code(), err.to_string())
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Source lines the item refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Offending source text for errors, or the output path for pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured data payload (node counts, error category)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResultError>,
}

impl ResultItem {
    fn new(kind: Kind, path: Option<String>) -> Self {
        Self {
            kind,
            path,
            range: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// A template that parsed without errors
    pub fn template(path: impl Into<String>) -> Self {
        Self::new(Kind::Template, Some(path.into()))
    }

    /// A rendered page
    pub fn page(path: impl Into<String>) -> Self {
        Self::new(Kind::Page, Some(path.into()))
    }

    /// A copied static file
    pub fn asset(path: impl Into<String>) -> Self {
        Self::new(Kind::Asset, Some(path.into()))
    }

    /// An error not tied to a file
    pub fn error(error: ResultError) -> Self {
        let mut item = Self::new(Kind::Error, None);
        item.errors.push(error);
        item
    }

    /// A template that failed to parse
    pub fn markup_error(path: impl Into<String>, err: &MarkupError) -> Self {
        let mut item = Self::new(Kind::Error, Some(path.into()));
        item.range = err.line().map(|l| RangeLine::line(l as u32));
        item.data = Some(serde_json::json!({ "category": err.category() }));
        item.errors.push(err.into());
        item
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (&a.range, &b.range) {
                (Some(ra), Some(rb)) => ra.start.cmp(&rb.start),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    /// Number of error items
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|i| i.kind == Kind::Error).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

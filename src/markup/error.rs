//! Markup parse errors
//!
//! Every error names the 1-based source line it was raised on so callers can
//! point the author at the offending text.

use serde::Serialize;
use thiserror::Error;

/// Broad class of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Structural,
    Syntax,
    Reference,
}

/// Errors produced while turning markup text into a node tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("line {line}: indentation below group level: {text:?}")]
    IndentBelowGroup { line: usize, text: String },

    #[error("line {line}: lines at the same indentation as {text:?} inside one group")]
    AmbiguousGroup { line: usize, text: String },

    #[error("line {line}: cannot tell the node type of {text:?} (no quoted value and no nested lines)")]
    UndeterminedNode { line: usize, text: String },

    #[error("line {line}: quoted value {text:?} cannot have nested lines")]
    NestedScalar { line: usize, text: String },

    #[error("no lines to parse")]
    EmptyGroup,

    #[error("line {line}: nesting deeper than {limit} levels")]
    DepthExceeded { line: usize, limit: usize },

    #[error("line {line}: template expands to more than {limit} nodes")]
    NodeLimitExceeded { line: usize, limit: usize },

    #[error("line {line}: missing ':' in {text:?}")]
    MissingColon { line: usize, text: String },

    #[error("line {line}: empty key in {text:?}")]
    EmptyKey { line: usize, text: String },

    #[error("line {line}: missing closing quote in {text:?}")]
    UnterminatedQuote { line: usize, text: String },

    #[error("line {line}: unknown anchor '{name}'")]
    UnknownAnchor { line: usize, name: String },

    #[error("line {line}: anchor '{name}' is not a mapping and cannot be merged with '<<'")]
    OverrideNotMapping { line: usize, name: String },
}

impl MarkupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MarkupError::IndentBelowGroup { .. }
            | MarkupError::AmbiguousGroup { .. }
            | MarkupError::UndeterminedNode { .. }
            | MarkupError::NestedScalar { .. }
            | MarkupError::EmptyGroup
            | MarkupError::DepthExceeded { .. }
            | MarkupError::NodeLimitExceeded { .. } => ErrorCategory::Structural,
            MarkupError::MissingColon { .. }
            | MarkupError::EmptyKey { .. }
            | MarkupError::UnterminatedQuote { .. } => ErrorCategory::Syntax,
            MarkupError::UnknownAnchor { .. } | MarkupError::OverrideNotMapping { .. } => {
                ErrorCategory::Reference
            }
        }
    }

    /// Stable machine-readable code, used in `check` output
    pub fn code(&self) -> &'static str {
        match self {
            MarkupError::IndentBelowGroup { .. } => "INDENT_BELOW_GROUP",
            MarkupError::AmbiguousGroup { .. } => "AMBIGUOUS_GROUP",
            MarkupError::UndeterminedNode { .. } => "UNDETERMINED_NODE",
            MarkupError::NestedScalar { .. } => "NESTED_SCALAR",
            MarkupError::EmptyGroup => "EMPTY_GROUP",
            MarkupError::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            MarkupError::NodeLimitExceeded { .. } => "NODE_LIMIT_EXCEEDED",
            MarkupError::MissingColon { .. } => "MISSING_COLON",
            MarkupError::EmptyKey { .. } => "EMPTY_KEY",
            MarkupError::UnterminatedQuote { .. } => "UNTERMINATED_QUOTE",
            MarkupError::UnknownAnchor { .. } => "UNKNOWN_ANCHOR",
            MarkupError::OverrideNotMapping { .. } => "OVERRIDE_NOT_MAPPING",
        }
    }

    /// Source line of the failure, if it is tied to one
    pub fn line(&self) -> Option<usize> {
        match self {
            MarkupError::EmptyGroup => None,
            MarkupError::IndentBelowGroup { line, .. }
            | MarkupError::AmbiguousGroup { line, .. }
            | MarkupError::UndeterminedNode { line, .. }
            | MarkupError::NestedScalar { line, .. }
            | MarkupError::DepthExceeded { line, .. }
            | MarkupError::NodeLimitExceeded { line, .. }
            | MarkupError::MissingColon { line, .. }
            | MarkupError::EmptyKey { line, .. }
            | MarkupError::UnterminatedQuote { line, .. }
            | MarkupError::UnknownAnchor { line, .. }
            | MarkupError::OverrideNotMapping { line, .. } => Some(*line),
        }
    }
}

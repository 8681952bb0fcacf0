//! Node type determination for a line group

use crate::markup::error::MarkupError;
use crate::markup::lines::Line;
use crate::markup::scalar::{has_quote, parse_key};

/// Merge key that splices an anchor's fields into the current level
pub const OVERRIDE_KEY: &str = "<<";

/// What a group denotes
///
/// `Alias` and `Override` only exist while parsing; they are resolved into
/// regular nodes before the tree is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Raw,
    Children,
    Alias,
    Override,
}

/// Decide the kind of a group from its defining line and indentation shape
pub fn classify(group: &[Line<'_>]) -> Result<GroupKind, MarkupError> {
    let Some(definition) = group.first() else {
        return Err(MarkupError::EmptyGroup);
    };

    if has_quote(definition.text) {
        return Ok(GroupKind::Raw);
    }

    if definition.text.contains('*') {
        let key = parse_key(definition, definition.text)?;
        return Ok(if key == OVERRIDE_KEY {
            GroupKind::Override
        } else {
            GroupKind::Alias
        });
    }

    let Some(second) = group.get(1) else {
        return Err(MarkupError::UndeterminedNode {
            line: definition.number,
            text: definition.text.to_string(),
        });
    };

    let level = definition.indentation();

    // A key with no value and nothing nested under it.
    if second.indentation() <= level {
        return Ok(GroupKind::Raw);
    }

    if let Some(stray) = group[1..].iter().find(|l| l.indentation() == level) {
        return Err(MarkupError::AmbiguousGroup {
            line: stray.number,
            text: definition.text.to_string(),
        });
    }

    Ok(GroupKind::Children)
}

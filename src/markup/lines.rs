//! Line preprocessing and indentation grouping
//!
//! A *group* is one defining line followed by every deeper-indented line
//! below it. Groups are found level by level: the continuation lines of a
//! group are grouped again to find its children.

use crate::markup::error::MarkupError;

/// Columns a tab character counts for
pub const TAB_WIDTH: usize = 4;

/// A significant source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the input text
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Leading indentation in columns
    pub fn indentation(&self) -> usize {
        indentation(self.text)
    }
}

/// Count leading indentation: a space is one column, a tab is four
pub fn indentation(text: &str) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH,
            _ => break,
        }
    }
    width
}

/// Split text into lines, dropping blank and comment-only lines
///
/// Kept lines preserve their original indentation. Trailing comments are
/// left in place; the scalar extractor deals with them.
pub fn significant_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(index, line)| Line::new(index + 1, line))
        .collect()
}

/// Partition lines into sibling groups
///
/// The first line fixes the group level. Every line at that level starts a
/// new group, deeper lines continue the current one.
pub fn collect_groups<'l, 'a>(lines: &'l [Line<'a>]) -> Result<Vec<&'l [Line<'a>]>, MarkupError> {
    let Some(first) = lines.first() else {
        return Ok(Vec::new());
    };

    let level = first.indentation();
    let mut groups = Vec::new();
    let mut start = 0;

    for (index, line) in lines.iter().enumerate().skip(1) {
        let indent = line.indentation();

        if indent < level {
            return Err(MarkupError::IndentBelowGroup {
                line: line.number,
                text: line.text.to_string(),
            });
        }

        if indent == level {
            groups.push(&lines[start..index]);
            start = index;
        }
    }

    groups.push(&lines[start..]);
    Ok(groups)
}

//! Field extraction from a defining line
//!
//! Handles `key: "value"` splitting, quoted scalars with escapes and
//! trailing comments, `&anchor` declarations and `*alias` references.

use std::borrow::Cow;

use crate::markup::error::MarkupError;
use crate::markup::lines::Line;

/// Characters that open or close a quoted scalar
pub const QUOTES: [char; 2] = ['\'', '"'];

/// Characters that end an anchor or alias name
fn is_name_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '#' | ':' | '&' | '*')
}

/// Whether the line holds a quote character anywhere
pub fn has_quote(text: &str) -> bool {
    text.contains(QUOTES)
}

/// Extract the field key: left of the first colon, trimmed, list marker removed
pub fn parse_key(line: &Line<'_>, text: &str) -> Result<String, MarkupError> {
    let Some((lhs, _)) = text.split_once(':') else {
        return Err(MarkupError::MissingColon {
            line: line.number,
            text: line.text.to_string(),
        });
    };

    let key = lhs.trim().trim_start_matches(['-', ' ', '\t']);
    if key.is_empty() {
        return Err(MarkupError::EmptyKey {
            line: line.number,
            text: line.text.to_string(),
        });
    }

    Ok(key.to_string())
}

/// Extract the quoted value right of the first colon
///
/// A backslash escapes the next character, so `\"` is a literal quote.
/// Only the quote character that opened a scalar closes it. A `#` outside
/// quotes ends the line. Text outside quotes is dropped.
pub fn extract_raw_content(line: &Line<'_>, text: &str) -> Result<String, MarkupError> {
    let Some((_, rhs)) = text.split_once(':') else {
        return Err(MarkupError::MissingColon {
            line: line.number,
            text: line.text.to_string(),
        });
    };

    let mut value = String::with_capacity(rhs.len());
    let mut open_quote: Option<char> = None;
    let mut escaped = false;

    for c in rhs.chars() {
        if c == '#' && open_quote.is_none() {
            break;
        }

        if c == '\\' && !escaped {
            escaped = true;
            continue;
        }

        if QUOTES.contains(&c) && !escaped {
            match open_quote {
                None => open_quote = Some(c),
                Some(q) if q == c => open_quote = None,
                Some(_) => {}
            }
        } else if open_quote.is_some() {
            value.push(c);
        }

        escaped = false;
    }

    if open_quote.is_some() {
        return Err(MarkupError::UnterminatedQuote {
            line: line.number,
            text: line.text.to_string(),
        });
    }

    Ok(value)
}

/// Read the name that follows `marker` up to the next delimiter
///
/// Returns the byte range of the marker plus name, and the name itself.
fn marked_name(text: &str, marker: char) -> Option<(usize, usize, &str)> {
    let start = text.find(marker)?;
    let name_start = start + marker.len_utf8();
    let name_end = text[name_start..]
        .find(is_name_delimiter)
        .map(|offset| name_start + offset)
        .unwrap_or(text.len());
    Some((start, name_end, &text[name_start..name_end]))
}

/// Split an `&anchor` declaration off a line
///
/// Returns the line with `&name` removed and the declared name, if any.
/// A bare `&` is removed without declaring anything.
pub fn extract_anchor(text: &str) -> (Cow<'_, str>, Option<String>) {
    match marked_name(text, '&') {
        None => (Cow::Borrowed(text), None),
        Some((start, end, name)) => {
            let stripped = format!("{}{}", &text[..start], &text[end..]);
            let name = (!name.is_empty()).then(|| name.to_string());
            (Cow::Owned(stripped), name)
        }
    }
}

/// Name referenced by a `*alias`, if the line has one
pub fn alias_target(text: &str) -> Option<&str> {
    marked_name(text, '*').map(|(_, _, name)| name)
}

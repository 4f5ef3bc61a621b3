//! Fixed-column field extraction utilities
//!
//! Bulletin lines are positional: every value lives at a fixed character
//! range. These helpers cut ranges out of a line and coerce them into typed
//! values, turning unparsable content into `None` plus a warning instead of
//! an error.

use std::ops::Range;

use super::warnings::ParseWarning;
use crate::models::SourceLine;

/// A line is blank when nothing but spaces remains after stripping them
pub fn is_blank(line: &str) -> bool {
    line.trim_matches(' ').is_empty()
}

/// Cut a character range out of a line, clamped to the line length
pub fn slice(line: &str, range: Range<usize>) -> &str {
    if line.is_ascii() {
        let end = range.end.min(line.len());
        let start = range.start.min(end);
        return &line[start..end];
    }

    let byte_offset = |position: usize| {
        line.char_indices()
            .nth(position)
            .map_or(line.len(), |(offset, _)| offset)
    };
    let start = byte_offset(range.start);
    let end = byte_offset(range.end).max(start);
    &line[start..end]
}

/// Character at a position, if the line is long enough
pub fn char_at(line: &str, position: usize) -> Option<char> {
    if line.is_ascii() {
        return line.as_bytes().get(position).map(|&b| b as char);
    }
    line.chars().nth(position)
}

/// Number of characters in a line
pub fn char_len(line: &str) -> usize {
    if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    }
}

/// Trimmed content of a range, `None` when blank
pub fn text(line: &str, range: Range<usize>) -> Option<&str> {
    let value = slice(line, range).trim();
    (!value.is_empty()).then_some(value)
}

/// Lenient float conversion, `None` on any failure
pub fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Lenient integer conversion, `None` on any failure
pub fn parse_i64(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Typed field access over one source line
///
/// Blank fields decode to `None` silently. Fields with content that does not
/// parse decode to `None` and push an [`ParseWarning::InvalidField`].
pub struct FieldReader<'a, 'w> {
    line: SourceLine<'a>,
    warnings: &'w mut Vec<ParseWarning>,
}

impl<'a, 'w> FieldReader<'a, 'w> {
    pub fn new(line: SourceLine<'a>, warnings: &'w mut Vec<ParseWarning>) -> Self {
        Self { line, warnings }
    }

    pub fn line(&self) -> SourceLine<'a> {
        self.line
    }

    pub fn text(&self, range: Range<usize>) -> Option<String> {
        text(self.line.text, range).map(str::to_string)
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        char_at(self.line.text, position).filter(|c| *c != ' ')
    }

    pub fn f64(&mut self, field: &'static str, range: Range<usize>) -> Option<f64> {
        let raw = text(self.line.text, range)?;
        let parsed = parse_f64(raw);
        if parsed.is_none() {
            self.invalid(field, raw);
        }
        parsed
    }

    pub fn i64(&mut self, field: &'static str, range: Range<usize>) -> Option<i64> {
        let raw = text(self.line.text, range)?;
        let parsed = parse_i64(raw);
        if parsed.is_none() {
            self.invalid(field, raw);
        }
        parsed
    }

    /// Integer that must also fit the target type, e.g. an hour into `u8`
    pub fn int<T: TryFrom<i64>>(&mut self, field: &'static str, range: Range<usize>) -> Option<T> {
        let raw = text(self.line.text, range)?;
        let parsed = parse_i64(raw).and_then(|v| T::try_from(v).ok());
        if parsed.is_none() {
            self.invalid(field, raw);
        }
        parsed
    }

    /// Single-character code mapped through `from_code`; unknown codes warn
    pub fn code<T>(
        &mut self,
        field: &'static str,
        position: usize,
        from_code: fn(char) -> Option<T>,
    ) -> Option<T> {
        let code = self.char_at(position)?;
        let decoded = from_code(code);
        if decoded.is_none() {
            let warning = ParseWarning::UnknownCode {
                line: self.line.number,
                field,
                code,
            };
            self.warn(warning);
        }
        decoded
    }

    pub fn warn(&mut self, warning: ParseWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn invalid(&mut self, field: &'static str, raw: &str) {
        let warning = ParseWarning::InvalidField {
            line: self.line.number,
            field,
            value: raw.to_string(),
        };
        self.warn(warning);
    }
}

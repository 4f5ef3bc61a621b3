//! Non-fatal parsing diagnostics
//!
//! A malformed line or block never aborts a bulletin. The parser records one
//! of these warnings, logs it and carries on with the rest of the file.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("line {line}: unrecognized record type tag {tag:?}, line skipped")]
    UnrecognizedTag { line: usize, tag: char },

    #[error("block {block} starting at line {line} has no type 7 table marker, block skipped")]
    MissingTableMarker { block: usize, line: usize },

    #[error("line {line}: invalid value {value:?} for field {field}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown {field} code {code:?}")]
    UnknownCode {
        line: usize,
        field: &'static str,
        code: char,
    },

    #[error("event {event_id}: header declares {expected} stations but the table lists {found}")]
    StationCountMismatch {
        event_id: u32,
        expected: u32,
        found: usize,
    },
}

impl ParseWarning {
    /// Source line the warning refers to, when it concerns a single line
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseWarning::UnrecognizedTag { line, .. }
            | ParseWarning::MissingTableMarker { line, .. }
            | ParseWarning::InvalidField { line, .. }
            | ParseWarning::UnknownCode { line, .. } => Some(*line),
            ParseWarning::StationCountMismatch { .. } => None,
        }
    }
}

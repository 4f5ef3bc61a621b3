//! Line classification by trailing type tag

use crate::constants::tags;

/// Record type of a bulletin line, read from its last character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Type 1: origin time, location and magnitudes
    Hypocenter,
    /// Type 3: free-text comment
    Comment,
    /// Type 6: waveform file reference
    Waveform,
    /// Type 7: start of the station/phase table
    PhaseHeader,
    /// Type E: hypocenter error estimates
    ErrorEstimate,
    /// Type I: administrative action and event ID
    Admin,
    /// Any other tag; the line is skipped with a warning
    Unrecognized(char),
}

impl RecordType {
    /// Header record types in the order their decoders are merged
    pub const HEADER_TYPES: [RecordType; 5] = [
        RecordType::Hypocenter,
        RecordType::Comment,
        RecordType::Waveform,
        RecordType::ErrorEstimate,
        RecordType::Admin,
    ];

    pub fn from_tag(tag: char) -> Self {
        match tag {
            tags::HYPOCENTER => RecordType::Hypocenter,
            tags::COMMENT => RecordType::Comment,
            tags::WAVEFORM => RecordType::Waveform,
            tags::PHASE_HEADER => RecordType::PhaseHeader,
            tags::ERROR_ESTIMATE => RecordType::ErrorEstimate,
            tags::ADMIN => RecordType::Admin,
            other => RecordType::Unrecognized(other),
        }
    }

    /// Classify a line; an empty line has no tag and is unrecognized
    pub fn classify(line: &str) -> Self {
        line.chars()
            .next_back()
            .map_or(RecordType::Unrecognized(' '), Self::from_tag)
    }

    pub fn tag(&self) -> char {
        match self {
            RecordType::Hypocenter => tags::HYPOCENTER,
            RecordType::Comment => tags::COMMENT,
            RecordType::Waveform => tags::WAVEFORM,
            RecordType::PhaseHeader => tags::PHASE_HEADER,
            RecordType::ErrorEstimate => tags::ERROR_ESTIMATE,
            RecordType::Admin => tags::ADMIN,
            RecordType::Unrecognized(tag) => *tag,
        }
    }
}

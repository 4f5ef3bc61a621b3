//! Event block parsing
//!
//! Splits one block into its header and its station table, decodes both,
//! and joins them into the flat rows of one event.

use tracing::{debug, warn};

use super::classifier::RecordType;
use super::phase_table::{decode_phase_table, distinct_stations};
use super::warnings::ParseWarning;
use crate::header::decode_header;
use crate::models::{EventHeader, ParseBlock, SourceLine, StationPhase};
use crate::table::Row;

/// Header and table decoded from one block, before an event ID is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub header: EventHeader,
    pub phases: Vec<StationPhase>,
}

/// Outcome of parsing one block: the event, if any, and its warnings
#[derive(Debug, Clone, PartialEq)]
pub struct BlockResult {
    pub block: ParseBlock,
    pub event: Option<ParsedEvent>,
    pub warnings: Vec<ParseWarning>,
}

/// Attach 1-based file line numbers to the lines of a block
pub fn number_lines<'a, S: AsRef<str>>(block: ParseBlock, lines: &'a [S]) -> Vec<SourceLine<'a>> {
    lines[block.start..block.end]
        .iter()
        .enumerate()
        .map(|(offset, text)| SourceLine {
            number: block.start + offset + 1,
            text: text.as_ref(),
        })
        .collect()
}

/// Parse one block of a bulletin
///
/// `index` is the position of the block among all blocks of the file and is
/// only used for diagnostics. A block without a type 7 marker yields no
/// event and a [`ParseWarning::MissingTableMarker`].
pub fn parse_block<S: AsRef<str>>(
    index: usize,
    block: ParseBlock,
    lines: &[S],
) -> BlockResult {
    let numbered = number_lines(block, lines);
    let mut warnings = Vec::new();

    let table_start = numbered
        .iter()
        .position(|line| RecordType::classify(line.text) == RecordType::PhaseHeader);

    let Some(table_start) = table_start else {
        let warning = ParseWarning::MissingTableMarker {
            block: index,
            line: block.start + 1,
        };
        warn!("{}", warning);
        warnings.push(warning);
        return BlockResult {
            block,
            event: None,
            warnings,
        };
    };

    let (header_lines, table_lines) = numbered.split_at(table_start);
    let header = decode_header(header_lines, &mut warnings);
    let phases = decode_phase_table(table_lines, &mut warnings);

    debug!(
        "Block {} ({} lines from line {}): {} header lines, {} phase rows",
        index,
        block.len(),
        block.start + 1,
        header_lines.len(),
        phases.len()
    );

    BlockResult {
        block,
        event: Some(ParsedEvent { header, phases }),
        warnings,
    }
}

/// Compare the declared station count with the stations in the table
///
/// A mismatch is only a warning; the event is kept either way.
pub fn check_station_count(event_id: u32, event: &ParsedEvent) -> Option<ParseWarning> {
    let expected = event.header.expected_stations()?;
    let found = distinct_stations(&event.phases);
    (expected as usize != found).then_some(ParseWarning::StationCountMismatch {
        event_id,
        expected,
        found,
    })
}

/// Replicate the event header onto every phase row
///
/// Each row receives its own copy of the header, so later edits to one row
/// never leak into another.
pub fn broadcast_join(event_id: u32, header: &EventHeader, phases: Vec<StationPhase>) -> Vec<Row> {
    phases
        .into_iter()
        .map(|phase| Row {
            event_id,
            event: header.clone(),
            phase,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hypocenter;

    #[test]
    fn test_number_lines_uses_file_positions() {
        let lines = ["", "a", "b", ""];
        let numbered = number_lines(ParseBlock { start: 1, end: 3 }, &lines);
        assert_eq!(
            numbered,
            vec![
                SourceLine { number: 2, text: "a" },
                SourceLine { number: 3, text: "b" },
            ]
        );
    }

    #[test]
    fn test_block_without_marker_is_skipped() {
        let lines = [" header line                1", " another                    3"];
        let result = parse_block(4, ParseBlock { start: 0, end: 2 }, &lines);

        assert!(result.event.is_none());
        assert_eq!(
            result.warnings,
            vec![ParseWarning::MissingTableMarker { block: 4, line: 1 }]
        );
    }

    #[test]
    fn test_station_count_check() {
        let mut event = ParsedEvent {
            header: EventHeader {
                hypocenter: Some(Hypocenter {
                    expected_stations: Some(2),
                    ..Default::default()
                }),
                ..Default::default()
            },
            phases: vec![
                StationPhase {
                    station: Some("PESTR".into()),
                    ..Default::default()
                },
                StationPhase {
                    station: Some("PMOZ".into()),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(check_station_count(0, &event), None);

        event.phases.pop();
        assert_eq!(
            check_station_count(3, &event),
            Some(ParseWarning::StationCountMismatch {
                event_id: 3,
                expected: 2,
                found: 1,
            })
        );

        event.header.hypocenter = None;
        assert_eq!(check_station_count(3, &event), None);
    }

    #[test]
    fn test_broadcast_join_copies_header() {
        let header = EventHeader {
            waveform_files: vec!["w.wav".into()],
            ..Default::default()
        };
        let phases = vec![StationPhase::default(), StationPhase::default()];

        let rows = broadcast_join(5, &header, phases);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.event_id == 5 && row.event == header));
    }
}

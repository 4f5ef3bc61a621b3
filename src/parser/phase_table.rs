//! Station/phase table decoding
//!
//! Everything from the type 7 marker to the end of a block is a fixed-width
//! table with one observation per line. The marker itself only labels the
//! columns and is not a data row.

use super::fields::{FieldReader, is_blank};
use super::warnings::ParseWarning;
use crate::constants::phase;
use crate::models::{SourceLine, StationPhase};

/// Decode the table portion of a block, starting at its type 7 marker line
pub fn decode_phase_table(
    lines: &[SourceLine<'_>],
    warnings: &mut Vec<ParseWarning>,
) -> Vec<StationPhase> {
    lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line.text))
        .map(|line| decode_phase_row(*line, warnings))
        .collect()
}

/// Decode one observation row; blank fields stay `None`
///
/// The amplitude columns are only read for amplitude phases.
pub fn decode_phase_row(line: SourceLine<'_>, warnings: &mut Vec<ParseWarning>) -> StationPhase {
    let mut reader = FieldReader::new(line, warnings);

    let phase_name = reader.text(phase::PHASE);
    let amplitude = if phase_name.as_deref().is_some_and(is_amplitude_phase) {
        reader.f64("amplitude", phase::AMPLITUDE)
    } else {
        None
    };

    StationPhase {
        station: reader.text(phase::STATION),
        component: reader.text(phase::COMPONENT),
        phase: phase_name,
        hour: reader.int("phase_hour", phase::HOUR),
        minute: reader.int("phase_minute", phase::MINUTE),
        second: reader.f64("phase_second", phase::SECOND),
        amplitude,
        distance: reader.f64("distance", phase::DISTANCE),
    }
}

pub fn is_amplitude_phase(name: &str) -> bool {
    phase::AMPLITUDE_PHASE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Number of distinct station codes in a decoded table
pub fn distinct_stations(rows: &[StationPhase]) -> usize {
    let mut stations: Vec<&str> = rows.iter().filter_map(|row| row.station.as_deref()).collect();
    stations.sort_unstable();
    stations.dedup();
    stations.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str =
        " STAT SP IPHASW D HRMM SECON CODA AMPLIT PERI AZIMU VELO AIN AR TRES W  DIS CAZ7";
    const P_ROW: &str =
        " PESTRHZ IP     D 0110 43.54                                             54 302 ";
    const AMPLITUDE_ROW: &str =
        " PESTRHZ  IAML    0110 45.10       123.4 0.20                            54 302 ";

    fn numbered<'a>(lines: &[&'a str]) -> Vec<SourceLine<'a>> {
        lines
            .iter()
            .enumerate()
            .map(|(idx, text)| SourceLine {
                number: idx + 10,
                text,
            })
            .collect()
    }

    #[test]
    fn test_marker_is_not_a_row() {
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER]), &mut warnings);
        assert!(rows.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_decode_arrival_row() {
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER, P_ROW]), &mut warnings);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.station.as_deref(), Some("PESTR"));
        assert_eq!(row.component.as_deref(), Some("HZ"));
        assert_eq!(row.phase.as_deref(), Some("P"));
        assert_eq!(row.hour, Some(1));
        assert_eq!(row.minute, Some(10));
        assert_eq!(row.second, Some(43.54));
        assert_eq!(row.amplitude, None);
        assert_eq!(row.distance, Some(54.0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_decode_amplitude_row() {
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER, AMPLITUDE_ROW]), &mut warnings);

        assert_eq!(rows[0].phase.as_deref(), Some("IAML"));
        assert_eq!(rows[0].amplitude, Some(123.4));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_amplitude_ignored_for_arrival_phase() {
        let mut row = P_ROW.to_string();
        row.replace_range(33..40, "  987.6");
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER, &row]), &mut warnings);

        assert_eq!(rows[0].phase.as_deref(), Some("P"));
        assert_eq!(rows[0].amplitude, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_amplitude_phase_names() {
        assert!(is_amplitude_phase("IAML"));
        assert!(is_amplitude_phase("AMB"));
        assert!(!is_amplitude_phase("P"));
        assert!(!is_amplitude_phase("IS"));
    }

    #[test]
    fn test_sparse_row_is_kept() {
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER, " XX"]), &mut warnings);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].station.as_deref(), Some("XX"));
        assert_eq!(rows[0].hour, None);
        assert_eq!(rows[0].second, None);
    }

    #[test]
    fn test_bad_number_becomes_missing() {
        let mut row = P_ROW.to_string();
        row.replace_range(23..28, "4x.54");
        let mut warnings = Vec::new();
        let rows = decode_phase_table(&numbered(&[MARKER, &row]), &mut warnings);

        assert_eq!(rows[0].second, None);
        assert_eq!(rows[0].minute, Some(10));
        assert_eq!(
            warnings,
            vec![ParseWarning::InvalidField {
                line: 11,
                field: "phase_second",
                value: "4x.54".to_string(),
            }]
        );
    }

    #[test]
    fn test_distinct_stations() {
        let rows = vec![
            StationPhase {
                station: Some("PESTR".into()),
                ..Default::default()
            },
            StationPhase {
                station: Some("PESTR".into()),
                ..Default::default()
            },
            StationPhase {
                station: Some("PMOZ".into()),
                ..Default::default()
            },
            StationPhase::default(),
        ];
        assert_eq!(distinct_stations(&rows), 2);
    }
}

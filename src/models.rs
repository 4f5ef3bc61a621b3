//! Core data structures and types for Nordic bulletin processing.
//!
//! Defines the event-level records decoded from the header lines of a
//! block, the station/phase observations decoded from its table, and the
//! processing statistics reported by the pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How far the event is from the reporting network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceIndicator {
    Local,
    Regional,
    Distant,
}

impl DistanceIndicator {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'L' => Some(DistanceIndicator::Local),
            'R' => Some(DistanceIndicator::Regional),
            'D' => Some(DistanceIndicator::Distant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceIndicator::Local => "Local",
            DistanceIndicator::Regional => "Regional",
            DistanceIndicator::Distant => "Distant",
        }
    }
}

/// Kind of seismic source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Quake,
    Volcanic,
    Unknown,
    Explosion,
}

impl EventType {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'Q' => Some(EventType::Quake),
            'V' => Some(EventType::Volcanic),
            'U' => Some(EventType::Unknown),
            'E' => Some(EventType::Explosion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Quake => "Quake",
            EventType::Volcanic => "Volcanic",
            EventType::Unknown => "Unknown",
            EventType::Explosion => "Explosion",
        }
    }
}

/// One reported magnitude of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magnitude {
    pub value: f64,
    /// Magnitude scale code, e.g. `L` for local or `b` for body-wave
    pub kind: String,
    pub agency: Option<String>,
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}{}", self.value, self.kind)
    }
}

/// Origin, location and magnitudes decoded from the type 1 lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hypocenter {
    pub origin_time: Option<NaiveDateTime>,
    pub distance_indicator: Option<DistanceIndicator>,
    pub event_type: Option<EventType>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub depth: Option<f64>,
    pub agency: Option<String>,
    pub expected_stations: Option<u32>,
    pub magnitudes: Vec<Magnitude>,
}

/// Labelled free-text comments (type 3)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
    pub region: Option<String>,
    pub felt: Option<String>,
    pub publication: Option<String>,
    pub seismic_zone: Option<String>,
    pub volcanic_zone: Option<String>,
}

/// Hypocenter uncertainties (type E)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEstimate {
    pub gap: Option<i32>,
    pub origin_time: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub depth: Option<f64>,
    pub cov_xy: Option<f64>,
    pub cov_xz: Option<f64>,
    pub cov_yz: Option<f64>,
}

/// Processing history of the event (type I)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub action: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub operator: Option<String>,
    pub status: Option<String>,
    pub id: Option<i64>,
}

/// Combined event-level attributes of one block
///
/// Every section is optional so a block that lacks a record type simply
/// leaves the matching columns empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventHeader {
    pub hypocenter: Option<Hypocenter>,
    pub comments: Comments,
    pub waveform_files: Vec<String>,
    pub error_estimate: Option<ErrorEstimate>,
    pub admin: Option<AdminRecord>,
}

impl EventHeader {
    pub fn expected_stations(&self) -> Option<u32> {
        self.hypocenter.as_ref().and_then(|h| h.expected_stations)
    }

    pub fn magnitudes(&self) -> &[Magnitude] {
        self.hypocenter
            .as_ref()
            .map(|h| h.magnitudes.as_slice())
            .unwrap_or(&[])
    }
}

/// One arrival recorded at one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPhase {
    pub station: Option<String>,
    pub component: Option<String>,
    pub phase: Option<String>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<f64>,
    pub distance: Option<f64>,
    pub amplitude: Option<f64>,
}

/// Half-open line range `[start, end)` of one event within the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBlock {
    pub start: usize,
    pub end: usize,
}

impl ParseBlock {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A line together with its 1-based position in the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub blocks_found: usize,
    pub events_parsed: usize,
    pub blocks_skipped: usize,
    pub total_rows: usize,
    pub warnings: usize,
    pub output_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_indicator_codes() {
        assert_eq!(DistanceIndicator::from_code('L'), Some(DistanceIndicator::Local));
        assert_eq!(DistanceIndicator::from_code('R'), Some(DistanceIndicator::Regional));
        assert_eq!(DistanceIndicator::from_code('D'), Some(DistanceIndicator::Distant));
        assert_eq!(DistanceIndicator::from_code('X'), None);
        assert_eq!(DistanceIndicator::Distant.as_str(), "Distant");
    }

    #[test]
    fn test_event_type_codes() {
        assert_eq!(EventType::from_code('Q'), Some(EventType::Quake));
        assert_eq!(EventType::from_code('E'), Some(EventType::Explosion));
        assert_eq!(EventType::from_code(' '), None);
    }

    #[test]
    fn test_magnitude_display() {
        let magnitude = Magnitude {
            value: 2.3,
            kind: "L".to_string(),
            agency: Some("IPM".to_string()),
        };
        assert_eq!(magnitude.to_string(), "2.3L");
    }

    #[test]
    fn test_header_without_hypocenter() {
        let header = EventHeader::default();
        assert_eq!(header.expected_stations(), None);
        assert!(header.magnitudes().is_empty());
    }
}

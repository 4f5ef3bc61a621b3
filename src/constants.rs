//! Application constants for the Nordic bulletin processor
//!
//! This module contains the fixed column layout of every supported record
//! type, the record-type tags, the comment labels and the canonical column
//! names of the flattened output table.
//!
//! All column ranges are 0-based, half-open character positions
//! (`1..5` is characters 2 to 5 of the printed 80-column line).

use std::ops::Range;

// =============================================================================
// Record Type Tags
// =============================================================================

/// Trailing character identifying the record type of a line
pub mod tags {
    pub const HYPOCENTER: char = '1';
    pub const COMMENT: char = '3';
    pub const WAVEFORM: char = '6';
    pub const PHASE_HEADER: char = '7';
    pub const ERROR_ESTIMATE: char = 'E';
    pub const ADMIN: char = 'I';
}

// =============================================================================
// Type 1: Hypocenter Line
// =============================================================================

/// Column layout of the type 1 (hypocenter) line
pub mod hypocenter {
    use super::Range;

    pub const YEAR: Range<usize> = 1..5;
    pub const MONTH: Range<usize> = 6..8;
    pub const DAY: Range<usize> = 8..10;
    pub const HOUR: Range<usize> = 11..13;
    pub const MINUTE: Range<usize> = 13..15;
    pub const SECOND: Range<usize> = 16..18;

    /// Single digit holding tenths of a second
    pub const TENTHS: Range<usize> = 19..20;

    pub const DISTANCE_INDICATOR: usize = 21;
    pub const EVENT_TYPE: usize = 22;
    pub const LATITUDE: Range<usize> = 23..30;
    pub const LONGITUDE: Range<usize> = 30..38;
    pub const DEPTH: Range<usize> = 38..43;
    pub const AGENCY: Range<usize> = 45..48;
    pub const STATION_COUNT: Range<usize> = 48..51;

    /// Microseconds represented by one tenths digit
    pub const MICROS_PER_TENTH: u32 = 100_000;
}

/// Repeating magnitude fields on type 1 lines
pub mod magnitude {
    /// Offset of the first magnitude field
    pub const SCAN_START: usize = 55;

    /// The scan stops once a field would start at or beyond this offset
    pub const SCAN_END: usize = 79;

    /// Distance between two consecutive magnitude fields
    pub const STRIDE: usize = 8;

    /// Width of the numeric magnitude value
    pub const VALUE_WIDTH: usize = 4;

    /// Width of the value plus its one-character type code
    pub const FIELD_WIDTH: usize = VALUE_WIDTH + 1;

    /// Width of the reporting agency that follows the type code
    pub const AGENCY_WIDTH: usize = 3;
}

// =============================================================================
// Type 3: Comment Line
// =============================================================================

/// Labelled comment lines carrying event metadata
pub mod comments {
    pub const REGION: &str = "REGIAO";
    pub const FELT: &str = "SENTIDO";
    pub const PUBLICATION: &str = "PUBLICACAO";

    /// Labels recognised by default
    pub const DEFAULT_LABELS: &[&str] = &[REGION, FELT, PUBLICATION];

    /// Separator between a label and its value
    pub const VALUE_SEPARATOR: &str = ": ";

    /// Separator between the region name and its zone tags
    pub const ZONE_SEPARATOR: char = ',';

    pub const SEISMIC_ZONE_MARKER: &str = "SZ";
    pub const VOLCANIC_ZONE_MARKER: &str = "VZ";

    /// Trailing characters (type tag and the column before it) dropped before splitting
    pub const TRAILER_WIDTH: usize = 2;
}

// =============================================================================
// Type E: Error Estimate Line
// =============================================================================

/// Column layout of the type E (hypocenter error) line
pub mod error_estimate {
    use super::Range;

    pub const GAP: Range<usize> = 5..8;
    pub const ORIGIN_TIME: Range<usize> = 14..20;
    pub const LATITUDE: Range<usize> = 24..30;
    pub const LONGITUDE: Range<usize> = 32..38;
    pub const DEPTH: Range<usize> = 38..43;
    pub const COV_XY: Range<usize> = 43..55;
    pub const COV_XZ: Range<usize> = 55..67;
    pub const COV_YZ: Range<usize> = 67..79;
}

// =============================================================================
// Type I: Administrative Line
// =============================================================================

/// Column layout of the type I (action/ID) line
pub mod admin {
    use super::Range;

    pub const ACTION: Range<usize> = 8..11;
    pub const TIMESTAMP: Range<usize> = 12..26;
    pub const OPERATOR: Range<usize> = 30..34;
    pub const STATUS: Range<usize> = 42..56;
    pub const ID: Range<usize> = 60..74;

    /// Format of the action timestamp, e.g. `14-12-01 10:30`
    pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M";
}

// =============================================================================
// Type 7: Station/Phase Table
// =============================================================================

/// Column layout of the station/phase rows that follow the type 7 marker
pub mod phase {
    use super::Range;

    pub const STATION: Range<usize> = 1..6;
    pub const COMPONENT: Range<usize> = 6..8;
    pub const PHASE: Range<usize> = 10..15;
    pub const HOUR: Range<usize> = 18..20;
    pub const MINUTE: Range<usize> = 20..22;
    pub const SECOND: Range<usize> = 22..28;
    pub const AMPLITUDE: Range<usize> = 33..40;
    pub const DISTANCE: Range<usize> = 70..75;

    /// Phase names carrying an amplitude reading start with one of these, e.g. `IAML`
    pub const AMPLITUDE_PHASE_PREFIXES: &[&str] = &["IA", "A"];
}

// =============================================================================
// Output Table Columns
// =============================================================================

/// Canonical column names of the flattened table
pub mod columns {
    // Identity
    pub const EVENT_ID: &str = "event_id";

    // Hypocenter
    pub const ORIGIN_TIME: &str = "origin_time";
    pub const DISTANCE_INDICATOR: &str = "distance_indicator";
    pub const EVENT_TYPE: &str = "event_type";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const DEPTH: &str = "depth";
    pub const AGENCY: &str = "agency";
    pub const EXPECTED_STATIONS: &str = "expected_stations";
    pub const MAGNITUDES: &str = "magnitudes";

    // Comments
    pub const REGION: &str = "region";
    pub const FELT: &str = "felt";
    pub const PUBLICATION: &str = "publication";
    pub const SEISMIC_ZONE: &str = "seismic_zone";
    pub const VOLCANIC_ZONE: &str = "volcanic_zone";

    // Waveforms
    pub const WAVEFORM_FILES: &str = "waveform_files";

    // Error estimates
    pub const GAP: &str = "gap";
    pub const ORIGIN_TIME_ERROR: &str = "origin_time_error";
    pub const LATITUDE_ERROR: &str = "latitude_error";
    pub const LONGITUDE_ERROR: &str = "longitude_error";
    pub const DEPTH_ERROR: &str = "depth_error";
    pub const COV_XY: &str = "cov_xy";
    pub const COV_XZ: &str = "cov_xz";
    pub const COV_YZ: &str = "cov_yz";

    // Administrative
    pub const ADMIN_ID: &str = "admin_id";
    pub const ADMIN_ACTION: &str = "admin_action";
    pub const ADMIN_TIMESTAMP: &str = "admin_timestamp";
    pub const ADMIN_OPERATOR: &str = "admin_operator";
    pub const ADMIN_STATUS: &str = "admin_status";

    // Station/phase
    pub const STATION: &str = "station";
    pub const COMPONENT: &str = "component";
    pub const PHASE: &str = "phase";
    pub const HOUR: &str = "hour";
    pub const MINUTE: &str = "minute";
    pub const SECOND: &str = "second";
    pub const DISTANCE: &str = "distance";
    pub const AMPLITUDE: &str = "amplitude";

    /// Every column in output order
    pub const ALL: &[&str] = &[
        EVENT_ID,
        ORIGIN_TIME,
        DISTANCE_INDICATOR,
        EVENT_TYPE,
        LATITUDE,
        LONGITUDE,
        DEPTH,
        AGENCY,
        EXPECTED_STATIONS,
        MAGNITUDES,
        REGION,
        FELT,
        PUBLICATION,
        SEISMIC_ZONE,
        VOLCANIC_ZONE,
        WAVEFORM_FILES,
        GAP,
        ORIGIN_TIME_ERROR,
        LATITUDE_ERROR,
        LONGITUDE_ERROR,
        DEPTH_ERROR,
        COV_XY,
        COV_XZ,
        COV_YZ,
        ADMIN_ID,
        ADMIN_ACTION,
        ADMIN_TIMESTAMP,
        ADMIN_OPERATOR,
        ADMIN_STATUS,
        STATION,
        COMPONENT,
        PHASE,
        HOUR,
        MINUTE,
        SECOND,
        DISTANCE,
        AMPLITUDE,
    ];
}

/// Separator used when a list value is flattened into a single cell
pub const LIST_SEPARATOR: &str = ";";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default output file extension
pub const PARQUET_EXTENSION: &str = "parquet";

/// Compression used when none is requested
pub const DEFAULT_COMPRESSION: &str = "snappy";

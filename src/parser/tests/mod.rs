//! Shared fixtures for bulletin parser tests

use std::io::Write;
use tempfile::NamedTempFile;


/// Two events and one block without a station table
///
/// Lines 1-10 hold event 0 (three phase rows from two stations), line 12 a
/// comment-only block and lines 14-17 event 1, which declares three stations,
/// lists one and contains a line with the unknown tag `Z`.
pub const SAMPLE_BULLETIN: &str = include_str!("../../../tests/data/bulletin.txt");

pub const TABLE_MARKER: &str =
    " STAT SP IPHASW D HRMM SECON CODA AMPLIT PERI AZIMU VELO AIN AR TRES W  DIS CAZ7";

/// Build an 80-column line with `fields` placed at 0-based columns
pub fn line_with(fields: &[(usize, &str)], tag: char) -> String {
    let mut chars = vec![' '; 80];
    for (start, value) in fields {
        for (offset, c) in value.chars().enumerate() {
            chars[start + offset] = c;
        }
    }
    chars[79] = tag;
    chars.into_iter().collect()
}

/// Minimal type 1 line with a location and one magnitude
pub fn hypocenter_line(latitude: &str, magnitude: &str) -> String {
    line_with(
        &[
            (1, "2024"),
            (6, " 3"),
            (8, "07"),
            (11, "12"),
            (13, "30"),
            (16, "05"),
            (18, "."),
            (19, "2"),
            (21, "L"),
            (22, "Q"),
            (23, latitude),
            (30, "  -8.250"),
            (38, " 12.0"),
            (45, "IPM"),
            (55, magnitude),
        ],
        '1',
    )
}

/// Phase row for one station
pub fn phase_line(station: &str) -> String {
    line_with(
        &[
            (1, station),
            (6, "HZ"),
            (10, "P"),
            (18, "12"),
            (20, "30"),
            (22, " 09.75"),
            (70, "   21"),
        ],
        ' ',
    )
}

/// One event block: hypocenter, marker and a phase row per station
pub fn event_block(latitude: &str, stations: &[&str]) -> String {
    let mut lines = vec![hypocenter_line(latitude, " 2.3L"), TABLE_MARKER.to_string()];
    lines.extend(stations.iter().map(|station| phase_line(station)));
    lines.join("\n")
}

pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

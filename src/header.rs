//! Event header decoding.
//!
//! The lines of a block that precede the station table carry the
//! event-level attributes. Lines are grouped by their record type, each
//! group is handed to the decoder registered for that type, and the
//! resulting [`HeaderSection`]s are folded into one [`EventHeader`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::constants::{admin, comments, error_estimate, hypocenter, magnitude};
use crate::models::{
    AdminRecord, Comments, DistanceIndicator, ErrorEstimate, EventHeader, EventType, Hypocenter,
    Magnitude, SourceLine,
};
use crate::parser::classifier::RecordType;
use crate::parser::fields::{FieldReader, char_len, parse_f64, slice, text};
use crate::parser::warnings::ParseWarning;

/// Attributes contributed by one record type
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderSection {
    Hypocenter(Hypocenter),
    Comments(Comments),
    Waveforms(Vec<String>),
    ErrorEstimate(ErrorEstimate),
    Admin(AdminRecord),
}

/// Decoder for all lines sharing one record type; `lines` is never empty
pub type Decoder = fn(&[SourceLine<'_>], &mut Vec<ParseWarning>) -> HeaderSection;

/// Decoder registered for a record type, `None` for types without one
pub fn decoder_for(record_type: RecordType) -> Option<Decoder> {
    match record_type {
        RecordType::Hypocenter => Some(decode_hypocenter),
        RecordType::Comment => Some(decode_comments),
        RecordType::Waveform => Some(decode_waveforms),
        RecordType::ErrorEstimate => Some(decode_error_estimate),
        RecordType::Admin => Some(decode_admin),
        RecordType::PhaseHeader | RecordType::Unrecognized(_) => None,
    }
}

/// Decode the header portion of a block
pub fn decode_header(lines: &[SourceLine<'_>], warnings: &mut Vec<ParseWarning>) -> EventHeader {
    let mut groups: Vec<(RecordType, Vec<SourceLine<'_>>)> = RecordType::HEADER_TYPES
        .iter()
        .map(|record_type| (*record_type, Vec::new()))
        .collect();

    for line in lines {
        let record_type = RecordType::classify(line.text);
        match groups.iter_mut().find(|(t, _)| *t == record_type) {
            Some((_, group)) => group.push(*line),
            None => {
                let warning = ParseWarning::UnrecognizedTag {
                    line: line.number,
                    tag: record_type.tag(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    let mut builder = HeaderBuilder::new();
    for (record_type, group) in groups.iter().filter(|(_, group)| !group.is_empty()) {
        if let Some(decode) = decoder_for(*record_type) {
            builder.push(decode(group, warnings));
        }
    }
    builder.build()
}

/// Reducer folding decoded sections into one header
///
/// Each canonical record type fills its own slot, so sections never
/// overwrite each other's attributes.
#[derive(Debug, Default)]
pub struct HeaderBuilder {
    header: EventHeader,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: HeaderSection) {
        match section {
            HeaderSection::Hypocenter(hypocenter) => self.header.hypocenter = Some(hypocenter),
            HeaderSection::Comments(comments) => self.header.comments = comments,
            HeaderSection::Waveforms(files) => self.header.waveform_files = files,
            HeaderSection::ErrorEstimate(estimate) => self.header.error_estimate = Some(estimate),
            HeaderSection::Admin(record) => self.header.admin = Some(record),
        }
    }

    pub fn build(self) -> EventHeader {
        self.header
    }
}

// =============================================================================
// Type 1
// =============================================================================

/// Location from the first line, magnitudes from every line
fn decode_hypocenter(
    lines: &[SourceLine<'_>],
    warnings: &mut Vec<ParseWarning>,
) -> HeaderSection {
    let mut reader = FieldReader::new(lines[0], warnings);

    let mut hypo = Hypocenter {
        origin_time: decode_origin_time(&mut reader),
        distance_indicator: reader.code(
            "distance_indicator",
            hypocenter::DISTANCE_INDICATOR,
            DistanceIndicator::from_code,
        ),
        event_type: reader.code("event_type", hypocenter::EVENT_TYPE, EventType::from_code),
        latitude: reader.f64("latitude", hypocenter::LATITUDE),
        longitude: reader.f64("longitude", hypocenter::LONGITUDE),
        depth: reader.f64("depth", hypocenter::DEPTH),
        agency: reader.text(hypocenter::AGENCY),
        expected_stations: reader.int("station_count", hypocenter::STATION_COUNT),
        magnitudes: Vec::new(),
    };

    for line in lines {
        hypo.magnitudes.extend(decode_magnitudes(*line, warnings));
    }

    HeaderSection::Hypocenter(hypo)
}

fn decode_origin_time(reader: &mut FieldReader<'_, '_>) -> Option<NaiveDateTime> {
    let year: i32 = reader.int("year", hypocenter::YEAR)?;
    let month: u32 = reader.int("month", hypocenter::MONTH)?;
    let day: u32 = reader.int("day", hypocenter::DAY)?;
    let hour: u32 = reader.int("hour", hypocenter::HOUR).unwrap_or(0);
    let minute: u32 = reader.int("minute", hypocenter::MINUTE).unwrap_or(0);
    let second: u32 = reader.int("second", hypocenter::SECOND).unwrap_or(0);
    let tenths: u32 = reader.int("tenths", hypocenter::TENTHS).unwrap_or(0);

    // second 60 rolls over into the next minute
    let (second, carry) = if second == 60 { (59, 1) } else { (second, 0) };

    let origin = NaiveDate::from_ymd_opt(year, month, day).and_then(|date| {
        date.and_hms_micro_opt(hour, minute, second, tenths * hypocenter::MICROS_PER_TENTH)
    });

    match origin {
        Some(origin) => Some(origin + Duration::seconds(carry)),
        None => {
            let line = reader.line();
            reader.warn(ParseWarning::InvalidField {
                line: line.number,
                field: "origin_time",
                value: slice(line.text, hypocenter::YEAR.start..hypocenter::TENTHS.end)
                    .to_string(),
            });
            None
        }
    }
}

/// Scan the repeating magnitude fields of one type 1 line
///
/// Blank values are skipped, never stored as zero.
pub fn decode_magnitudes(line: SourceLine<'_>, warnings: &mut Vec<ParseWarning>) -> Vec<Magnitude> {
    let line_len = char_len(line.text);
    let mut magnitudes = Vec::new();
    let mut start = magnitude::SCAN_START;

    while start < magnitude::SCAN_END && start + magnitude::FIELD_WIDTH <= line_len {
        let value_end = start + magnitude::VALUE_WIDTH;

        if let Some(raw) = text(line.text, start..value_end) {
            match parse_f64(raw) {
                Some(value) => magnitudes.push(Magnitude {
                    value,
                    kind: slice(line.text, value_end..value_end + 1).trim().to_string(),
                    agency: text(
                        line.text,
                        value_end + 1..value_end + 1 + magnitude::AGENCY_WIDTH,
                    )
                    .map(str::to_string),
                }),
                None => {
                    let warning = ParseWarning::InvalidField {
                        line: line.number,
                        field: "magnitude",
                        value: raw.to_string(),
                    };
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        start += magnitude::STRIDE;
    }

    magnitudes
}

// =============================================================================
// Type 3
// =============================================================================

fn decode_comments(
    lines: &[SourceLine<'_>],
    _warnings: &mut Vec<ParseWarning>,
) -> HeaderSection {
    let mut decoded = Comments::default();

    for line in lines {
        let Some((label, value)) = split_labelled(line.text) else {
            continue;
        };

        match label {
            comments::REGION => apply_region(&mut decoded, value),
            comments::FELT => decoded.felt = Some(value.to_string()),
            comments::PUBLICATION => decoded.publication = Some(value.to_string()),
            _ => {}
        }
    }

    HeaderSection::Comments(decoded)
}

/// Split a recognised `LABEL: value` comment; other comments yield `None`
fn split_labelled(line: &str) -> Option<(&'static str, &str)> {
    let body_len = char_len(line).saturating_sub(comments::TRAILER_WIDTH);
    let body = slice(line, 0..body_len);

    // labels start in the second column
    if !body.starts_with(' ') {
        return None;
    }
    let body = body.trim();

    let label = comments::DEFAULT_LABELS
        .iter()
        .find(|label| body.starts_with(**label))?;
    let (_, value) = body.split_once(comments::VALUE_SEPARATOR)?;
    Some((*label, value.trim()))
}

/// Region values may carry zone tags: `Lisboa,VZ14,SZ31`
fn apply_region(decoded: &mut Comments, value: &str) {
    let mut tokens = value
        .split(comments::ZONE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty());

    decoded.region = tokens.next().map(str::to_string);

    for token in tokens {
        if token.contains(comments::SEISMIC_ZONE_MARKER) {
            decoded.seismic_zone = Some(token.to_string());
        } else if token.contains(comments::VOLCANIC_ZONE_MARKER) {
            decoded.volcanic_zone = Some(token.to_string());
        }
    }
}

// =============================================================================
// Type 6
// =============================================================================

fn decode_waveforms(
    lines: &[SourceLine<'_>],
    _warnings: &mut Vec<ParseWarning>,
) -> HeaderSection {
    let files = lines
        .iter()
        .filter_map(|line| line.text.split_whitespace().next())
        .map(str::to_string)
        .collect();
    HeaderSection::Waveforms(files)
}

// =============================================================================
// Type E
// =============================================================================

fn decode_error_estimate(
    lines: &[SourceLine<'_>],
    warnings: &mut Vec<ParseWarning>,
) -> HeaderSection {
    if lines.len() > 1 {
        debug!("Ignoring {} extra type E lines", lines.len() - 1);
    }
    let mut reader = FieldReader::new(lines[0], warnings);

    HeaderSection::ErrorEstimate(ErrorEstimate {
        gap: reader.int("gap", error_estimate::GAP),
        origin_time: reader.f64("origin_time_error", error_estimate::ORIGIN_TIME),
        latitude: reader.f64("latitude_error", error_estimate::LATITUDE),
        longitude: reader.f64("longitude_error", error_estimate::LONGITUDE),
        depth: reader.f64("depth_error", error_estimate::DEPTH),
        cov_xy: reader.f64("cov_xy", error_estimate::COV_XY),
        cov_xz: reader.f64("cov_xz", error_estimate::COV_XZ),
        cov_yz: reader.f64("cov_yz", error_estimate::COV_YZ),
    })
}

// =============================================================================
// Type I
// =============================================================================

fn decode_admin(
    lines: &[SourceLine<'_>],
    warnings: &mut Vec<ParseWarning>,
) -> HeaderSection {
    if lines.len() > 1 {
        debug!("Ignoring {} extra type I lines", lines.len() - 1);
    }
    let mut reader = FieldReader::new(lines[0], warnings);

    let timestamp = reader.text(admin::TIMESTAMP).and_then(|raw| {
        match NaiveDateTime::parse_from_str(&raw, admin::TIMESTAMP_FORMAT) {
            Ok(timestamp) => Some(timestamp),
            Err(_) => {
                let line = reader.line();
                reader.warn(ParseWarning::InvalidField {
                    line: line.number,
                    field: "admin_timestamp",
                    value: raw,
                });
                None
            }
        }
    });

    HeaderSection::Admin(AdminRecord {
        action: reader.text(admin::ACTION),
        timestamp,
        operator: reader.text(admin::OPERATOR),
        status: reader.text(admin::STATUS),
        id: reader.i64("admin_id", admin::ID),
    })
}

//! Columnar schema of the output table.
//!
//! Converts the row-oriented [`Table`] into a Polars `DataFrame` with a
//! fixed set of typed columns, in the canonical column order. List-valued
//! attributes (magnitudes, waveform files) are flattened into one string
//! cell each.

use chrono::NaiveDateTime;
use polars::prelude::*;
use tracing::debug;

use crate::constants::{LIST_SEPARATOR, columns};
use crate::error::Result;
use crate::models::{AdminRecord, ErrorEstimate, Hypocenter};
use crate::table::{Row, Table};

fn datetime() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Every output column with its Polars type, in output order
pub fn column_types() -> Vec<(&'static str, DataType)> {
    use DataType::{Float64, Int32, Int64, String, UInt32};

    vec![
        (columns::EVENT_ID, UInt32),
        (columns::ORIGIN_TIME, datetime()),
        (columns::DISTANCE_INDICATOR, String),
        (columns::EVENT_TYPE, String),
        (columns::LATITUDE, Float64),
        (columns::LONGITUDE, Float64),
        (columns::DEPTH, Float64),
        (columns::AGENCY, String),
        (columns::EXPECTED_STATIONS, UInt32),
        (columns::MAGNITUDES, String),
        (columns::REGION, String),
        (columns::FELT, String),
        (columns::PUBLICATION, String),
        (columns::SEISMIC_ZONE, String),
        (columns::VOLCANIC_ZONE, String),
        (columns::WAVEFORM_FILES, String),
        (columns::GAP, Int32),
        (columns::ORIGIN_TIME_ERROR, Float64),
        (columns::LATITUDE_ERROR, Float64),
        (columns::LONGITUDE_ERROR, Float64),
        (columns::DEPTH_ERROR, Float64),
        (columns::COV_XY, Float64),
        (columns::COV_XZ, Float64),
        (columns::COV_YZ, Float64),
        (columns::ADMIN_ID, Int64),
        (columns::ADMIN_ACTION, String),
        (columns::ADMIN_TIMESTAMP, datetime()),
        (columns::ADMIN_OPERATOR, String),
        (columns::ADMIN_STATUS, String),
        (columns::STATION, String),
        (columns::COMPONENT, String),
        (columns::PHASE, String),
        (columns::HOUR, Int32),
        (columns::MINUTE, Int32),
        (columns::SECOND, Float64),
        (columns::DISTANCE, Float64),
        (columns::AMPLITUDE, Float64),
    ]
}

/// Render all magnitudes of an event as `2.3L;2.1b`
pub fn format_magnitudes(row: &Row) -> Option<String> {
    let magnitudes = row.event.magnitudes();
    (!magnitudes.is_empty()).then(|| {
        magnitudes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    })
}

fn format_waveforms(row: &Row) -> Option<String> {
    let files = &row.event.waveform_files;
    (!files.is_empty()).then(|| files.join(LIST_SEPARATOR))
}

fn millis(value: Option<NaiveDateTime>) -> Option<i64> {
    value.map(|timestamp| timestamp.and_utc().timestamp_millis())
}

fn hypo(row: &Row) -> Option<&Hypocenter> {
    row.event.hypocenter.as_ref()
}

fn error(row: &Row) -> Option<&ErrorEstimate> {
    row.event.error_estimate.as_ref()
}

fn admin(row: &Row) -> Option<&AdminRecord> {
    row.event.admin.as_ref()
}

fn column<T>(name: &str, values: Vec<T>) -> Column
where
    Series: NamedFrom<Vec<T>, [T]>,
{
    Series::new(name.into(), values).into()
}

/// Convert the table into a `DataFrame` with the canonical columns
///
/// An empty table still yields every column, with zero rows.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let rows = table.rows();

    macro_rules! collect {
        ($name:expr, $value:expr) => {
            column($name, rows.iter().map($value).collect::<Vec<_>>())
        };
    }

    let built = vec![
        collect!(columns::EVENT_ID, |r: &Row| r.event_id),
        collect!(columns::ORIGIN_TIME, |r: &Row| millis(
            hypo(r).and_then(|h| h.origin_time)
        )),
        collect!(columns::DISTANCE_INDICATOR, |r: &Row| hypo(r)
            .and_then(|h| h.distance_indicator)
            .map(|d| d.as_str())),
        collect!(columns::EVENT_TYPE, |r: &Row| hypo(r)
            .and_then(|h| h.event_type)
            .map(|t| t.as_str())),
        collect!(columns::LATITUDE, |r: &Row| hypo(r).and_then(|h| h.latitude)),
        collect!(columns::LONGITUDE, |r: &Row| hypo(r).and_then(|h| h.longitude)),
        collect!(columns::DEPTH, |r: &Row| hypo(r).and_then(|h| h.depth)),
        collect!(columns::AGENCY, |r: &Row| hypo(r).and_then(|h| h.agency.clone())),
        collect!(columns::EXPECTED_STATIONS, |r: &Row| r.event.expected_stations()),
        collect!(columns::MAGNITUDES, format_magnitudes),
        collect!(columns::REGION, |r: &Row| r.event.comments.region.clone()),
        collect!(columns::FELT, |r: &Row| r.event.comments.felt.clone()),
        collect!(columns::PUBLICATION, |r: &Row| r.event.comments.publication.clone()),
        collect!(columns::SEISMIC_ZONE, |r: &Row| r.event.comments.seismic_zone.clone()),
        collect!(columns::VOLCANIC_ZONE, |r: &Row| r.event.comments.volcanic_zone.clone()),
        collect!(columns::WAVEFORM_FILES, format_waveforms),
        collect!(columns::GAP, |r: &Row| error(r).and_then(|e| e.gap)),
        collect!(columns::ORIGIN_TIME_ERROR, |r: &Row| error(r).and_then(|e| e.origin_time)),
        collect!(columns::LATITUDE_ERROR, |r: &Row| error(r).and_then(|e| e.latitude)),
        collect!(columns::LONGITUDE_ERROR, |r: &Row| error(r).and_then(|e| e.longitude)),
        collect!(columns::DEPTH_ERROR, |r: &Row| error(r).and_then(|e| e.depth)),
        collect!(columns::COV_XY, |r: &Row| error(r).and_then(|e| e.cov_xy)),
        collect!(columns::COV_XZ, |r: &Row| error(r).and_then(|e| e.cov_xz)),
        collect!(columns::COV_YZ, |r: &Row| error(r).and_then(|e| e.cov_yz)),
        collect!(columns::ADMIN_ID, |r: &Row| admin(r).and_then(|a| a.id)),
        collect!(columns::ADMIN_ACTION, |r: &Row| admin(r).and_then(|a| a.action.clone())),
        collect!(columns::ADMIN_TIMESTAMP, |r: &Row| millis(
            admin(r).and_then(|a| a.timestamp)
        )),
        collect!(columns::ADMIN_OPERATOR, |r: &Row| admin(r).and_then(|a| a.operator.clone())),
        collect!(columns::ADMIN_STATUS, |r: &Row| admin(r).and_then(|a| a.status.clone())),
        collect!(columns::STATION, |r: &Row| r.phase.station.clone()),
        collect!(columns::COMPONENT, |r: &Row| r.phase.component.clone()),
        collect!(columns::PHASE, |r: &Row| r.phase.phase.clone()),
        collect!(columns::HOUR, |r: &Row| r.phase.hour.map(i32::from)),
        collect!(columns::MINUTE, |r: &Row| r.phase.minute.map(i32::from)),
        collect!(columns::SECOND, |r: &Row| r.phase.second),
        collect!(columns::DISTANCE, |r: &Row| r.phase.distance),
        collect!(columns::AMPLITUDE, |r: &Row| r.phase.amplitude),
    ];

    // bring every column to its canonical type, e.g. epoch millis to Datetime
    let typed = built
        .into_iter()
        .zip(column_types())
        .map(|(column, (_, dtype))| {
            if column.dtype() == &dtype {
                Ok(column)
            } else {
                column.cast(&dtype)
            }
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    let df = DataFrame::new(typed)?;
    debug!("Built DataFrame with {} rows and {} columns", df.height(), df.width());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventHeader, Magnitude, StationPhase};
    use crate::parser::BulletinParser;
    use chrono::NaiveDate;

    const SAMPLE: &str = include_str!("../tests/data/bulletin.txt");

    #[test]
    fn test_column_types_follow_canonical_order() {
        let names: Vec<&str> = column_types().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, columns::ALL);
    }

    #[test]
    fn test_empty_table_keeps_every_column() {
        let df = table_to_dataframe(&Table::new()).unwrap();

        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), columns::ALL.len());
        for (name, dtype) in column_types() {
            assert_eq!(df.column(name).unwrap().dtype(), &dtype, "column {}", name);
        }
    }

    #[test]
    fn test_sample_bulletin_frame() {
        let output = BulletinParser::default().parse_str(SAMPLE);
        let df = table_to_dataframe(&output.table).unwrap();

        assert_eq!(df.height(), 4);
        for (name, dtype) in column_types() {
            assert_eq!(df.column(name).unwrap().dtype(), &dtype, "column {}", name);
        }

        let ids: Vec<Option<u32>> = df.column("event_id").unwrap().u32().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(0), Some(0), Some(0), Some(1)]);

        let magnitudes = df.column("magnitudes").unwrap().str().unwrap();
        assert_eq!(magnitudes.get(0), Some("2.3L;2.1b"));
        assert_eq!(magnitudes.get(3), Some("3.0L"));

        let stations = df.column("station").unwrap().str().unwrap();
        assert_eq!(stations.get(2), Some("PMOZ"));

        let admin_ids = df.column("admin_id").unwrap().i64().unwrap();
        assert_eq!(admin_ids.get(0), Some(20230115011043));
        assert_eq!(admin_ids.get(3), None);

        let origin = df
            .column("origin_time")
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_milli_opt(1, 10, 43, 500)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(origin.i64().unwrap().get(0), Some(expected));
    }

    #[test]
    fn test_list_cells() {
        let row = Row {
            event_id: 0,
            event: EventHeader {
                hypocenter: Some(Hypocenter {
                    magnitudes: vec![
                        Magnitude {
                            value: 2.3,
                            kind: "L".to_string(),
                            agency: None,
                        },
                        Magnitude {
                            value: 3.1,
                            kind: "b".to_string(),
                            agency: Some("ISC".to_string()),
                        },
                    ],
                    ..Default::default()
                }),
                waveform_files: vec!["a.wav".to_string(), "b.wav".to_string()],
                ..Default::default()
            },
            phase: StationPhase::default(),
        };

        assert_eq!(format_magnitudes(&row).as_deref(), Some("2.3L;3.1b"));
        assert_eq!(format_waveforms(&row).as_deref(), Some("a.wav;b.wav"));

        let bare = Row {
            event_id: 0,
            event: EventHeader::default(),
            phase: StationPhase::default(),
        };
        assert_eq!(format_magnitudes(&bare), None);
        assert_eq!(format_waveforms(&bare), None);
    }
}

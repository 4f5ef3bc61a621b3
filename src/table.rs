//! The flat event/phase table.
//!
//! One row per station observation, each carrying a full copy of its
//! event's header. Rows of one event are always contiguous and events are
//! kept in ascending ID order, so an event is addressed as a run of rows.

use serde::Serialize;
use std::ops::Range;
use tracing::debug;

use crate::constants::columns;
use crate::error::{NordicError, Result};
use crate::models::{EventHeader, StationPhase};

/// One observation joined with the header of its event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub event_id: u32,
    pub event: EventHeader,
    pub phase: StationPhase,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Canonical column names, present even when the table is empty
    pub fn column_names(&self) -> &'static [&'static str] {
        columns::ALL
    }

    /// Append the rows of a new event; its ID must exceed every existing ID
    pub(crate) fn append_event(&mut self, rows: Vec<Row>) {
        debug_assert!(
            rows.first().zip(self.rows.last()).is_none_or(|(new, last)| new.event_id > last.event_id),
            "events must be appended in ascending ID order"
        );
        self.rows.extend(rows);
    }

    /// Sorted, de-duplicated event IDs
    pub fn event_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rows.iter().map(|row| row.event_id).collect();
        ids.dedup();
        ids
    }

    /// Number of distinct events
    pub fn event_count(&self) -> usize {
        self.event_ids().len()
    }

    /// First row of every event, i.e. one header per event
    pub fn unique_events(&self) -> Vec<&Row> {
        let mut events: Vec<&Row> = Vec::new();
        for row in &self.rows {
            if events.last().is_none_or(|last| last.event_id != row.event_id) {
                events.push(row);
            }
        }
        events
    }

    /// Row range occupied by one event
    pub fn event_range(&self, event_id: u32) -> Option<Range<usize>> {
        let start = self.rows.iter().position(|row| row.event_id == event_id)?;
        let len = self.rows[start..]
            .iter()
            .take_while(|row| row.event_id == event_id)
            .count();
        Some(start..start + len)
    }

    /// All rows of one event; empty when the event does not exist
    pub fn rows_for_event(&self, event_id: u32) -> &[Row] {
        match self.event_range(event_id) {
            Some(range) => &self.rows[range],
            None => &[],
        }
    }

    /// Remove every row of one event and return them
    pub fn remove_event(&mut self, event_id: u32) -> Result<Vec<Row>> {
        let range = self
            .event_range(event_id)
            .ok_or(NordicError::EventNotFound { event_id })?;
        debug!("Removing event {} ({} rows)", event_id, range.len());
        Ok(self.rows.drain(range).collect())
    }

    /// Insert a whole event as a contiguous run at its ordered position
    ///
    /// All rows must share one event ID that is not already in the table.
    pub fn insert_event(&mut self, rows: Vec<Row>) -> Result<()> {
        let Some(event_id) = rows.first().map(|row| row.event_id) else {
            return Err(NordicError::InvalidRowPosition {
                event_id: 0,
                position: 0,
                reason: "an event needs at least one row".to_string(),
            });
        };
        if rows.iter().any(|row| row.event_id != event_id) {
            return Err(NordicError::InvalidRowPosition {
                event_id,
                position: 0,
                reason: "rows of one event must share its ID".to_string(),
            });
        }
        if self.event_range(event_id).is_some() {
            return Err(NordicError::InvalidRowPosition {
                event_id,
                position: 0,
                reason: "event already exists".to_string(),
            });
        }

        let at = self.rows.partition_point(|row| row.event_id < event_id);
        debug!("Inserting event {} ({} rows) at row {}", event_id, rows.len(), at);
        self.rows.splice(at..at, rows);
        Ok(())
    }

    /// Insert one observation into an existing event
    ///
    /// `position` is relative to the event's run (`0..=len`). The new row
    /// receives a copy of the event header so the run stays consistent.
    pub fn insert_row(&mut self, event_id: u32, position: usize, phase: StationPhase) -> Result<()> {
        let range = self
            .event_range(event_id)
            .ok_or(NordicError::EventNotFound { event_id })?;
        if position > range.len() {
            return Err(NordicError::InvalidRowPosition {
                event_id,
                position,
                reason: format!("event has {} rows", range.len()),
            });
        }

        let row = Row {
            event_id,
            event: self.rows[range.start].event.clone(),
            phase,
        };
        self.rows.insert(range.start + position, row);
        Ok(())
    }

    /// Remove one observation of an event; removing the last one drops the event
    pub fn remove_row(&mut self, event_id: u32, position: usize) -> Result<Row> {
        let range = self
            .event_range(event_id)
            .ok_or(NordicError::EventNotFound { event_id })?;
        if position >= range.len() {
            return Err(NordicError::InvalidRowPosition {
                event_id,
                position,
                reason: format!("event has {} rows", range.len()),
            });
        }
        Ok(self.rows.remove(range.start + position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comments;

    fn row(event_id: u32, station: &str) -> Row {
        Row {
            event_id,
            event: EventHeader {
                comments: Comments {
                    region: Some(format!("region-{}", event_id)),
                    ..Default::default()
                },
                ..Default::default()
            },
            phase: StationPhase {
                station: Some(station.to_string()),
                ..Default::default()
            },
        }
    }

    fn stations(rows: &[Row]) -> Vec<&str> {
        rows.iter()
            .filter_map(|row| row.phase.station.as_deref())
            .collect()
    }

    fn sample() -> Table {
        let mut table = Table::new();
        table.append_event(vec![row(0, "A"), row(0, "B")]);
        table.append_event(vec![row(1, "C")]);
        table.append_event(vec![row(3, "D"), row(3, "E"), row(3, "F")]);
        table
    }

    #[test]
    fn test_empty_table_has_all_columns() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.column_names().len(), columns::ALL.len());
        assert_eq!(table.column_names()[0], "event_id");
        assert!(table.event_ids().is_empty());
    }

    #[test]
    fn test_event_queries() {
        let table = sample();
        assert_eq!(table.len(), 6);
        assert_eq!(table.event_ids(), vec![0, 1, 3]);
        assert_eq!(table.event_count(), 3);
        assert_eq!(stations(table.rows_for_event(3)), vec!["D", "E", "F"]);
        assert!(table.rows_for_event(2).is_empty());
        assert_eq!(table.event_range(1), Some(2..3));

        let firsts: Vec<&str> = table
            .unique_events()
            .iter()
            .filter_map(|row| row.phase.station.as_deref())
            .collect();
        assert_eq!(firsts, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_remove_event() {
        let mut table = sample();
        let removed = table.remove_event(0).unwrap();
        assert_eq!(stations(&removed), vec!["A", "B"]);
        assert_eq!(table.event_ids(), vec![1, 3]);

        assert!(matches!(
            table.remove_event(0),
            Err(NordicError::EventNotFound { event_id: 0 })
        ));
    }

    #[test]
    fn test_insert_event_keeps_order() {
        let mut table = sample();
        table.insert_event(vec![row(2, "X"), row(2, "Y")]).unwrap();

        assert_eq!(table.event_ids(), vec![0, 1, 2, 3]);
        assert_eq!(
            stations(table.rows()),
            vec!["A", "B", "C", "X", "Y", "D", "E", "F"]
        );
    }

    #[test]
    fn test_insert_event_rejects_bad_input() {
        let mut table = sample();
        assert!(table.insert_event(Vec::new()).is_err());
        assert!(table.insert_event(vec![row(1, "X")]).is_err());
        assert!(table.insert_event(vec![row(5, "X"), row(6, "Y")]).is_err());
        assert_eq!(table, sample());
    }

    #[test]
    fn test_insert_row_copies_header() {
        let mut table = sample();
        table
            .insert_row(
                3,
                1,
                StationPhase {
                    station: Some("N".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let event = table.rows_for_event(3);
        assert_eq!(stations(event), vec!["D", "N", "E", "F"]);
        assert_eq!(event[1].event, event[0].event);

        table.insert_row(1, 1, StationPhase::default()).unwrap();
        assert_eq!(table.rows_for_event(1).len(), 2);
    }

    #[test]
    fn test_insert_row_bounds() {
        let mut table = sample();
        assert!(matches!(
            table.insert_row(1, 2, StationPhase::default()),
            Err(NordicError::InvalidRowPosition { event_id: 1, position: 2, .. })
        ));
        assert!(matches!(
            table.insert_row(9, 0, StationPhase::default()),
            Err(NordicError::EventNotFound { event_id: 9 })
        ));
    }

    #[test]
    fn test_remove_row() {
        let mut table = sample();
        let removed = table.remove_row(3, 2).unwrap();
        assert_eq!(removed.phase.station.as_deref(), Some("F"));
        assert_eq!(stations(table.rows_for_event(3)), vec!["D", "E"]);

        assert!(table.remove_row(3, 2).is_err());

        table.remove_row(1, 0).unwrap();
        assert_eq!(table.event_ids(), vec![0, 3]);
    }
}

//! Nordic Processor Library
//!
//! A Rust library for converting Nordic-format seismic bulletins into a
//! flat event/station/phase table and optimized Apache Parquet files.
//!
//! This library provides tools for:
//! - Splitting a bulletin into blank-line separated event blocks
//! - Decoding the fixed-column header records (types 1, 3, 6, E and I)
//! - Decoding the station/phase table that follows the type 7 marker
//! - Joining every observation with its event header into one table
//! - Editing that table event by event
//! - Writing the table to Parquet with a fixed, typed schema
//!
//! Malformed lines and blocks never abort a bulletin. They are reported as
//! [`ParseWarning`]s next to the table; only an unreadable input is an error.
//!
//! ```no_run
//! # fn example() -> nordic_processor::Result<()> {
//! let output = nordic_processor::parse("bulletin.txt")?;
//! println!(
//!     "{} events, {} rows, {} warnings",
//!     output.table.event_count(),
//!     output.table.len(),
//!     output.warnings.len()
//! );
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod table;

pub use config::{CompressionAlgorithm, ParserConfig, ProcessorConfig};
pub use error::{NordicError, Result};
pub use models::{EventHeader, Magnitude, ProcessingStats, StationPhase};
pub use parser::{BulletinParser, ParseOutput, ParseWarning};
pub use processor::BulletinProcessor;
pub use schema::table_to_dataframe;
pub use table::{Row, Table};

use std::path::Path;

/// Parse a bulletin file with the default configuration
pub fn parse(path: impl AsRef<Path>) -> Result<ParseOutput> {
    BulletinParser::default().parse_file(path.as_ref())
}

//! Error handling for Nordic bulletin processing.
//!
//! Only failures that make the whole input unusable live here: a missing or
//! unreadable file, a broken encoding, an invalid configuration or a failed
//! Parquet write. Problems confined to one line or one event block are
//! reported as [`crate::parser::ParseWarning`] values instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NordicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Bulletin file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Bulletin file is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Event {event_id} not found in table")]
    EventNotFound { event_id: u32 },

    #[error("Invalid row position {position} for event {event_id}: {reason}")]
    InvalidRowPosition {
        event_id: u32,
        position: usize,
        reason: String,
    },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

pub type Result<T> = std::result::Result<T, NordicError>;

//! Parquet writing for assembled bulletins
//!
//! Writes the canonical `DataFrame` of a parsed bulletin to a single Parquet
//! file with the configured compression and statistics.

use crate::config::ProcessorConfig;
use crate::error::{NordicError, Result};

use polars::prelude::{DataFrame, ParquetCompression, ParquetWriter as PolarsParquetWriter, StatisticsOptions};
use std::path::PathBuf;
use tracing::debug;

/// Parquet writer for one output file
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    output_path: PathBuf,
    compression: ParquetCompression,
    enable_statistics: bool,
}

impl ParquetWriter {
    pub fn new(output_path: PathBuf, config: &ProcessorConfig) -> Self {
        Self {
            output_path,
            compression: config.compression.to_polars_compression(),
            enable_statistics: config.enable_statistics,
        }
    }

    /// Write the frame and return the number of rows written
    ///
    /// Blocking; run it on the blocking pool from async code.
    pub fn write(&self, mut df: DataFrame) -> Result<usize> {
        let rows = df.height();
        debug!(
            "Writing {} rows to {} ({:?})",
            rows,
            self.output_path.display(),
            self.compression
        );

        let file = std::fs::File::create(&self.output_path)?;
        let statistics = if self.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        PolarsParquetWriter::new(file)
            .with_compression(self.compression)
            .with_statistics(statistics)
            .finish(&mut df)
            .map_err(|e| NordicError::ProcessingFailed {
                path: self.output_path.clone(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        Ok(rows)
    }
}

//! Configuration management and validation.
//!
//! Provides configuration structures for bulletin parsing and for the
//! processing pipeline that turns a parsed bulletin into a Parquet file.

use crate::error::{NordicError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Options that change how a bulletin is decoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Compare the declared station count of each event with its table
    pub check_station_count: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            check_station_count: true,
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = NordicError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(NordicError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Global configuration for bulletin processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Decoder options
    pub parser: ParserConfig,

    /// Maximum number of event blocks parsed concurrently
    pub workers: usize,

    /// Compression algorithm for the Parquet output
    pub compression: CompressionAlgorithm,

    /// Enable column statistics in the Parquet output
    pub enable_statistics: bool,

    /// Show a progress bar while parsing blocks
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            workers: num_cpus::get(),
            compression: CompressionAlgorithm::Snappy,
            enable_statistics: true,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the Parquet compression
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Disable the station count cross-check
    pub fn without_station_check(mut self) -> Self {
        self.parser.check_station_count = false;
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(NordicError::Configuration {
                message: "workers must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

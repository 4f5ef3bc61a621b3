//! Bulletin processing pipeline.
//!
//! Reads a bulletin, parses its blocks concurrently on the blocking thread
//! pool, reassembles the events in file order and writes the resulting
//! table to Parquet.

pub mod writer;

#[cfg(test)]
pub mod tests;

use self::writer::ParquetWriter;

use crate::config::ProcessorConfig;
use crate::constants::PARQUET_EXTENSION;
use crate::error::{NordicError, Result};
use crate::models::ProcessingStats;
use crate::parser::{self, Assembler, ParseOutput, boundaries, chunk};
use crate::schema::table_to_dataframe;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, info};

/// Main processor for bulletin conversion
#[derive(Debug)]
pub struct BulletinProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: ProcessorConfig,
}

impl BulletinProcessor {
    /// Create a processor; the output defaults to the input with a `.parquet` extension
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(NordicError::FileNotFound { path: input_path });
        }

        let output_path = output_path.unwrap_or_else(|| default_output_path(&input_path));

        Ok(Self {
            input_path,
            output_path,
            config: ProcessorConfig::default(),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Read and parse the bulletin without writing any output
    ///
    /// Blocks are parsed with at most `workers` in flight. Results come back
    /// in block order, so event IDs match a sequential parse exactly.
    pub async fn parse(&self) -> Result<ParseOutput> {
        self.config.validate()?;

        let bytes = match fs::read(&self.input_path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(NordicError::FileNotFound {
                    path: self.input_path.clone(),
                });
            }
            Err(error) => return Err(error.into()),
        };
        let content = parser::decode_bulletin(&self.input_path, bytes)?;

        let lines: Arc<Vec<String>> = Arc::new(
            parser::split_lines(&content)
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
        let blocks = boundaries::find_blocks(&lines);
        debug!(
            "Found {} blocks in {} lines of {}",
            blocks.len(),
            lines.len(),
            self.input_path.display()
        );

        let pb = self.progress_bar(blocks.len() as u64);
        pb.set_message("Parsing events");

        let mut results = pin!(
            stream::iter(blocks.into_iter().enumerate())
                .map(|(index, block)| {
                    let lines = Arc::clone(&lines);
                    let pb = pb.clone();
                    async move {
                        let result =
                            task::spawn_blocking(move || chunk::parse_block(index, block, &lines))
                                .await;
                        pb.inc(1);
                        result
                    }
                })
                .buffered(self.config.workers)
        );

        let mut assembler = Assembler::new(self.config.parser.clone());
        while let Some(result) = results.next().await {
            let result = result.map_err(|e| NordicError::ProcessingFailed {
                path: self.input_path.clone(),
                reason: format!("Block parsing task failed: {}", e),
            })?;
            assembler.push(result);
        }

        pb.finish_with_message("All blocks parsed");

        let output = assembler.finish();
        info!(
            "Parsed {} events ({} rows) from {}",
            output.events_parsed(),
            output.table.len(),
            self.input_path.display()
        );
        Ok(output)
    }

    /// Main processing entry point: parse, write Parquet and print a summary
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!(
            "{}",
            "Starting bulletin processing".bright_green().bold()
        );
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            self.input_path.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.output_path.display()
        );

        println!("\n{}", "Parsing blocks...".bright_yellow());
        let output = self.parse().await?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        println!("\n{}", "Writing parquet...".bright_yellow());
        let df = table_to_dataframe(&output.table)?;
        let writer = ParquetWriter::new(self.output_path.clone(), &self.config);
        let total_rows = task::spawn_blocking(move || writer.write(df))
            .await
            .map_err(|e| NordicError::ProcessingFailed {
                path: self.output_path.clone(),
                reason: format!("Parquet writing task failed: {}", e),
            })??;

        let stats = ProcessingStats {
            blocks_found: output.blocks_found,
            events_parsed: output.events_parsed(),
            blocks_skipped: output.blocks_skipped,
            total_rows,
            warnings: output.warnings.len(),
            output_path: Some(self.output_path.clone()),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        print_summary(&stats);
        Ok(stats)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }
}

/// Output path used when none is given: the input with a `.parquet` extension
pub fn default_output_path(input_path: &Path) -> PathBuf {
    input_path.with_extension(PARQUET_EXTENSION)
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Events parsed:".bright_cyan(),
        stats.events_parsed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.total_rows.to_string().bright_white()
    );
    if stats.blocks_skipped > 0 {
        println!(
            "  {} {}",
            "Blocks skipped:".bright_cyan(),
            stats.blocks_skipped.to_string().bright_yellow()
        );
    }
    if stats.warnings > 0 {
        println!(
            "  {} {}",
            "Warnings:".bright_cyan(),
            stats.warnings.to_string().bright_yellow()
        );
    }
    if let Some(path) = &stats.output_path {
        println!(
            "  {} {}",
            "Output file:".bright_cyan(),
            path.display().to_string().bright_white()
        );
    }
}

//! Nordic bulletin parser
//!
//! Turns the text of a bulletin into a flat [`Table`] with one row per
//! station observation. The work is split into independent stages:
//!
//! - [`boundaries`] cuts the file into blank-line separated blocks
//! - [`classifier`] maps every line to its record type by its last column
//! - [`crate::header`] and [`phase_table`] decode the fixed-column fields
//! - [`chunk`] parses one block into an event and joins header and table
//! - [`Assembler`] numbers events in file order and collects the table
//!
//! Blocks are parsed independently of each other, so they can be fanned out
//! to workers as long as their results are handed to the [`Assembler`] in
//! block order.

pub mod boundaries;
pub mod chunk;
pub mod classifier;
pub mod fields;
pub mod phase_table;
pub mod warnings;

#[cfg(test)]
pub mod tests;

pub use chunk::{BlockResult, ParsedEvent};
pub use warnings::ParseWarning;

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::error::{NordicError, Result};
use crate::table::Table;

/// Parsed table together with the diagnostics gathered along the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub table: Table,
    pub warnings: Vec<ParseWarning>,
    pub blocks_found: usize,
    pub blocks_skipped: usize,
}

impl ParseOutput {
    pub fn events_parsed(&self) -> usize {
        self.blocks_found - self.blocks_skipped
    }
}

/// Read a bulletin into memory
///
/// A missing file and non UTF-8 content are the only fatal input problems.
pub fn read_bulletin(path: &Path) -> Result<String> {
    match std::fs::read(path) {
        Ok(bytes) => decode_bulletin(path, bytes),
        Err(error) if error.kind() == ErrorKind::NotFound => Err(NordicError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(error) => Err(error.into()),
    }
}

/// Validate the encoding of raw bulletin bytes
pub fn decode_bulletin(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| NordicError::InvalidEncoding {
        path: path.to_path_buf(),
    })
}

/// Split bulletin text into lines without their terminators
pub fn split_lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}

/// Folds block results into the final table in block order
///
/// Event IDs are assigned here, after reassembly, so they are sequential
/// and independent of how the blocks were scheduled.
#[derive(Debug)]
pub struct Assembler {
    config: ParserConfig,
    table: Table,
    warnings: Vec<ParseWarning>,
    next_event_id: u32,
    blocks_found: usize,
    blocks_skipped: usize,
}

impl Assembler {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            table: Table::new(),
            warnings: Vec::new(),
            next_event_id: 0,
            blocks_found: 0,
            blocks_skipped: 0,
        }
    }

    /// Add the result of the next block in file order
    pub fn push(&mut self, result: BlockResult) {
        self.blocks_found += 1;
        self.warnings.extend(result.warnings);

        let Some(event) = result.event else {
            self.blocks_skipped += 1;
            return;
        };

        let event_id = self.next_event_id;
        self.next_event_id += 1;

        if self.config.check_station_count {
            if let Some(warning) = chunk::check_station_count(event_id, &event) {
                warn!("{}", warning);
                self.warnings.push(warning);
            }
        }

        let rows = chunk::broadcast_join(event_id, &event.header, event.phases);
        self.table.append_event(rows);
    }

    pub fn finish(self) -> ParseOutput {
        ParseOutput {
            table: self.table,
            warnings: self.warnings,
            blocks_found: self.blocks_found,
            blocks_skipped: self.blocks_skipped,
        }
    }
}

/// Sequential bulletin parser
#[derive(Debug, Clone, Default)]
pub struct BulletinParser {
    config: ParserConfig,
}

impl BulletinParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse bulletin text that is already in memory
    pub fn parse_str(&self, content: &str) -> ParseOutput {
        let lines = split_lines(content);
        let blocks = boundaries::find_blocks(&lines);
        debug!("Found {} blocks in {} lines", blocks.len(), lines.len());

        let mut assembler = Assembler::new(self.config.clone());
        for (index, block) in blocks.into_iter().enumerate() {
            assembler.push(chunk::parse_block(index, block, &lines));
        }

        let output = assembler.finish();
        info!(
            "Parsed {} events ({} rows) from {} blocks, {} skipped, {} warnings",
            output.events_parsed(),
            output.table.len(),
            output.blocks_found,
            output.blocks_skipped,
            output.warnings.len()
        );
        output
    }

    /// Read and parse a bulletin file
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutput> {
        debug!("Reading bulletin {}", path.display());
        let content = read_bulletin(path)?;
        Ok(self.parse_str(&content))
    }
}

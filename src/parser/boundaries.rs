//! Event block detection
//!
//! A bulletin is a sequence of event blocks separated by one or more blank
//! lines. Each maximal run of non-blank lines becomes one [`ParseBlock`].

use super::fields::is_blank;
use crate::models::ParseBlock;

/// Split the lines of a file into event blocks, in file order
///
/// Leading, trailing and repeated blank lines never produce empty blocks.
/// End of input closes a block that is still open, so a file without a
/// trailing blank line loses nothing.
pub fn find_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<ParseBlock> {
    let mut blocks = Vec::new();
    let mut start = None;

    for (idx, line) in lines.iter().enumerate() {
        match (start, is_blank(line.as_ref())) {
            (None, false) => start = Some(idx),
            (Some(block_start), true) => {
                blocks.push(ParseBlock {
                    start: block_start,
                    end: idx,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(block_start) = start {
        blocks.push(ParseBlock {
            start: block_start,
            end: lines.len(),
        });
    }

    blocks
}

//! Coverage profile data model.
//!
//! A coverage profile, as written by `go test -coverprofile`, is a header line
//! naming the [`Mode`] followed by one line per instrumented block:
//!
//! ```text
//! mode: set
//! example.com/pkg/file.go:3.19,5.2 1 0
//! ```
//!
//! This module holds the in-memory representation. Reading lives in
//! [`parse`], writing in [`format`].

pub mod format;
pub mod parse;

use std::fmt;
use std::str::FromStr;

use crate::interval::Interval;

pub use format::{format_profile, ProfileWriter};
pub use parse::{parse_profiles, read_profiles};

/// The coverage discipline recorded in the profile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Whether each block ran at all
    Set,
    /// How many times each block ran
    Count,
    /// Like `Count`, but safe for parallel tests
    Atomic,
}

impl Mode {
    /// The name used in the `mode:` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Set => "set",
            Mode::Count => "count",
            Mode::Atomic => "atomic",
        }
    }

    /// Combine the counts of two entries reported for the same block.
    pub fn merge(&self, existing: i64, extra: i64) -> i64 {
        match self {
            Mode::Set => existing | extra,
            Mode::Count | Mode::Atomic => existing + extra,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Mode::Set),
            "count" => Ok(Mode::Count),
            "atomic" => Ok(Mode::Atomic),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instrumented region of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    /// Number of statements in the block
    pub num_stmt: u32,
    /// Hit count. Negative means the block is left out of the output.
    pub count: i64,
}

impl Block {
    /// Create a block with no statements and a zero hit count.
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
            num_stmt: 0,
            count: 0,
        }
    }

    /// Builder: set statement and hit counts
    pub fn with_counts(mut self, num_stmt: u32, count: i64) -> Self {
        self.num_stmt = num_stmt;
        self.count = count;
        self
    }

    /// The span covered by this block.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_line, self.start_col, self.end_line, self.end_col)
    }

    /// Whether the block is written to the output.
    pub fn is_retained(&self) -> bool {
        self.count >= 0
    }

    fn same_span(&self, other: &Block) -> bool {
        self.interval() == other.interval()
    }
}

/// All blocks reported for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Logical file name as written in the profile (usually an import path)
    pub file_name: String,
    pub mode: Mode,
    pub blocks: Vec<Block>,
}

impl Profile {
    /// Create an empty profile for a file.
    pub fn new(file_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks: Vec::new(),
        }
    }

    /// Builder: append a block
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Number of blocks that will be left out of the output.
    pub fn omitted_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_retained()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block() {
        let block = Block::new(1, 2, 3, 4);

        assert_eq!(block.start_line, 1);
        assert_eq!(block.start_col, 2);
        assert_eq!(block.end_line, 3);
        assert_eq!(block.end_col, 4);
        assert_eq!(block.num_stmt, 0);
        assert_eq!(block.count, 0);
    }

    #[test]
    fn test_mode_round_trip_names() {
        for mode in [Mode::Set, Mode::Count, Mode::Atomic] {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
        assert!("sometimes".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_merge() {
        assert_eq!(Mode::Set.merge(1, 1), 1);
        assert_eq!(Mode::Set.merge(0, 1), 1);
        assert_eq!(Mode::Count.merge(2, 3), 5);
        assert_eq!(Mode::Atomic.merge(0, 4), 4);
    }

    #[test]
    fn test_omitted_blocks() {
        let profile = Profile::new("f.go", Mode::Set)
            .with_block(Block::new(1, 1, 2, 1).with_counts(1, -1))
            .with_block(Block::new(3, 1, 4, 1).with_counts(1, 0));

        assert_eq!(profile.omitted_blocks(), 1);
    }
}

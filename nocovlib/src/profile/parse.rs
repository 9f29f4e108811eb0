//! Reading coverage profiles.
//!
//! Entries are grouped by file, files are returned sorted by name and blocks
//! sorted by position. A block reported more than once (several test binaries
//! writing to one profile) is merged according to the profile's [`Mode`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::{Block, Mode, Profile};
use crate::error::NocovError;
use crate::Result;

fn block_line() -> &'static Regex {
    static BLOCK_LINE: OnceLock<Regex> = OnceLock::new();
    BLOCK_LINE.get_or_init(|| {
        Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$")
            .expect("block line pattern is valid")
    })
}

/// Read and parse the coverage profile at `path`.
pub fn read_profiles(path: impl AsRef<Path>) -> Result<Vec<Profile>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| NocovError::ProfileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_profiles(BufReader::new(file), path)
}

/// Parse coverage profile text. `path` is only used in error messages.
pub fn parse_profiles(reader: impl BufRead, path: &Path) -> Result<Vec<Profile>> {
    let parse_error = |line: usize, message: String| NocovError::ProfileParse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut mode: Option<Mode> = None;
    let mut files: BTreeMap<String, Vec<Block>> = BTreeMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| NocovError::ProfileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix("mode: ") {
            let parsed = name.parse::<Mode>().map_err(|e| parse_error(line_no, e))?;
            match mode {
                None => mode = Some(parsed),
                Some(current) if current == parsed => {}
                Some(current) => {
                    return Err(parse_error(
                        line_no,
                        format!("mode '{parsed}' conflicts with earlier mode '{current}'"),
                    ));
                }
            }
            continue;
        }

        if mode.is_none() {
            return Err(parse_error(
                line_no,
                "first line must be 'mode: <set|count|atomic>'".to_string(),
            ));
        }

        let Some(caps) = block_line().captures(line) else {
            let message = format!("line {line:?} doesn't match expected format");
            return Err(parse_error(line_no, message));
        };

        let number = |i: usize| -> Result<usize> {
            caps[i]
                .parse()
                .map_err(|_| parse_error(line_no, format!("number '{}' out of range", &caps[i])))
        };

        let block = Block {
            start_line: number(2)?,
            start_col: number(3)?,
            end_line: number(4)?,
            end_col: number(5)?,
            num_stmt: caps[6]
                .parse()
                .map_err(|_| parse_error(line_no, format!("number '{}' out of range", &caps[6])))?,
            count: caps[7]
                .parse()
                .map_err(|_| parse_error(line_no, format!("number '{}' out of range", &caps[7])))?,
        };

        files.entry(caps[1].to_string()).or_default().push(block);
    }

    let Some(mode) = mode else {
        return Ok(Vec::new());
    };

    files
        .into_iter()
        .map(|(file_name, blocks)| {
            let invalid = |message: String| NocovError::ProfileParse {
                path: path.to_path_buf(),
                line: 0,
                message: format!("{file_name}: {message}"),
            };
            let blocks = merge_duplicates(mode, blocks).map_err(invalid)?;
            Ok(Profile {
                file_name,
                mode,
                blocks,
            })
        })
        .collect()
}

/// Sort blocks by position and fold repeated entries for the same span.
fn merge_duplicates(mode: Mode, mut blocks: Vec<Block>) -> std::result::Result<Vec<Block>, String> {
    blocks.sort_by_key(|b| (b.start_line, b.start_col, b.end_line, b.end_col));

    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.same_span(&block) => {
                if last.num_stmt != block.num_stmt {
                    return Err(format!(
                        "inconsistent statement count for block {}: {} vs {}",
                        block.interval(),
                        last.num_stmt,
                        block.num_stmt
                    ));
                }
                last.count = mode.merge(last.count, block.count);
            }
            _ => merged.push(block),
        }
    }

    Ok(merged)
}

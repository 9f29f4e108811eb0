//! End-to-end processing of a coverage profile.
//!
//! For every file named in the profile the [`Processor`]:
//!
//! 1. resolves the file on disk
//! 2. drops it entirely if the [`IgnoreMatcher`] says so
//! 3. parses it and locates marker comments
//! 4. rewrites the unexecuted blocks enclosed by each marker
//! 5. writes the remaining blocks
//!
//! The first error stops the run. Profiles already written stay written.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::enclosure::enclosing_interval;
use crate::error::NocovError;
use crate::ignore::IgnoreMatcher;
use crate::interval::Interval;
use crate::marker::{find_markers, DEFAULT_MARKER};
use crate::profile::{read_profiles, Profile, ProfileWriter};
use crate::resolve::PathResolver;
use crate::rewrite::{rewrite_blocks, DEFAULT_COVER_COUNT};
use crate::syntax::{SourceParser, SyntaxTree};
use crate::Result;

/// Options controlling how profiles are filtered.
#[derive(Debug)]
pub struct ProcessOptions {
    /// Comment prefix that marks untested code
    pub marker: String,
    /// Count given to marked, unexecuted blocks (negative removes them)
    pub cover_count: i64,
    /// Whole-file exclusion rules
    pub ignore: IgnoreMatcher,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            cover_count: DEFAULT_COVER_COUNT,
            ignore: IgnoreMatcher::new(),
        }
    }
}

impl ProcessOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker prefix.
    pub fn marker(mut self, prefix: impl Into<String>) -> Self {
        self.marker = prefix.into();
        self
    }

    /// Set the count assigned to marked blocks.
    pub fn cover_count(mut self, count: i64) -> Self {
        self.cover_count = count;
        self
    }

    /// Set the whole-file exclusion rules.
    pub fn ignore(mut self, matcher: IgnoreMatcher) -> Self {
        self.ignore = matcher;
        self
    }
}

/// What happened to a single file's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub markers: usize,
    pub blocks_rewritten: usize,
    pub blocks_omitted: usize,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files whose blocks were filtered and written
    pub files_processed: usize,
    /// Files dropped by the ignore rules
    pub files_ignored: Vec<String>,
    pub markers: usize,
    pub blocks_rewritten: usize,
    pub blocks_omitted: usize,
}

impl RunSummary {
    fn add(&mut self, file: FileSummary) {
        self.files_processed += 1;
        self.markers += file.markers;
        self.blocks_rewritten += file.blocks_rewritten;
        self.blocks_omitted += file.blocks_omitted;
    }
}

/// Apply the markers of one parsed file to its profile.
pub fn filter_profile(
    profile: &mut Profile,
    tree: &dyn SyntaxTree,
    marker: &str,
    cover_count: i64,
) -> FileSummary {
    let markers = find_markers(tree, marker);
    let file = &profile.file_name;

    let enclosures: Vec<Interval> = markers
        .iter()
        .filter_map(|m| {
            let enclosure = enclosing_interval(tree, m);
            match enclosure {
                Some(span) => log::debug!("{file}: marker at {} protects {span}", m.span),
                None => log::warn!("{file}: marker at {} has no enclosing construct", m.span),
            }
            enclosure
        })
        .collect();

    let blocks_rewritten = rewrite_blocks(&mut profile.blocks, &enclosures, cover_count);

    FileSummary {
        markers: markers.len(),
        blocks_rewritten,
        blocks_omitted: profile.omitted_blocks(),
    }
}

/// Runs profiles through resolution, ignore rules, marker rewriting and
/// output.
pub struct Processor<'a> {
    resolver: &'a dyn PathResolver,
    parser: &'a dyn SourceParser,
    options: ProcessOptions,
}

impl<'a> Processor<'a> {
    pub fn new(
        resolver: &'a dyn PathResolver,
        parser: &'a dyn SourceParser,
        options: ProcessOptions,
    ) -> Self {
        Self {
            resolver,
            parser,
            options,
        }
    }

    /// Read the profile at `path` and process it into `out`.
    pub fn process_path(&mut self, path: impl AsRef<Path>, out: impl Write) -> Result<RunSummary> {
        let profiles = read_profiles(path)?;
        self.process(profiles, out)
    }

    /// Process already-parsed profiles into `out`.
    pub fn process(&mut self, profiles: Vec<Profile>, out: impl Write) -> Result<RunSummary> {
        let mut writer = ProfileWriter::new(out);
        let mut summary = RunSummary::default();

        for mut profile in profiles {
            writer.write_header(&profile)?;

            match self.process_profile(&mut profile)? {
                Some(file) => {
                    writer.write_profile(&profile)?;
                    summary.add(file);
                }
                None => {
                    log::info!("ignoring {}", profile.file_name);
                    summary.files_ignored.push(profile.file_name);
                }
            }
            writer.flush()?;
        }

        Ok(summary)
    }

    /// Filter one profile in place. `None` means the file is ignored.
    fn process_profile(&mut self, profile: &mut Profile) -> Result<Option<FileSummary>> {
        let path = self.resolver.resolve(&profile.file_name)?;
        log::debug!("{} resolved to {}", profile.file_name, path.display());

        let ignore = &mut self.options.ignore;
        if ignore.should_ignore(&profile.file_name, None) {
            return Ok(None);
        }

        let data = fs::read(&path).map_err(|e| NocovError::FileRead {
            path: path.clone(),
            source: e,
        })?;

        if ignore.wants_content() && ignore.should_ignore(&profile.file_name, Some(&data)) {
            return Ok(None);
        }

        let source = String::from_utf8(data).map_err(|e| NocovError::SourceParse {
            path: path.clone(),
            message: format!("invalid UTF-8: {}", e),
        })?;
        let tree = self.parser.parse(&path, &source)?;

        Ok(Some(filter_profile(
            profile,
            tree.as_ref(),
            &self.options.marker,
            self.options.cover_count,
        )))
    }
}

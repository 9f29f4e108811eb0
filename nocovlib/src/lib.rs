//! # nocovlib
//!
//! Remove intentionally untested code from Go coverage profiles.
//!
//! ## Overview
//!
//! Some code is not worth testing: defensive panics, platform-specific
//! branches, usage printers. This library lets authors say so in the source
//! with a marker comment and rewrites the coverage profile accordingly:
//!
//! ```go
//! if err != nil {
//!     //nocoverage
//!     log.Fatal(err)
//! }
//! ```
//!
//! Every block of the profile that lies inside the construct enclosing a
//! marker and was never executed gets a configured count. The default count
//! of `-1` removes the block from the report.
//!
//! ## Features
//!
//! - **Marker comments**: configurable prefix, resolved to the smallest
//!   enclosing Go construct via tree-sitter
//! - **Executed code is never touched**: only zero-count blocks are rewritten
//! - **Whole-file rules**: ignore directories, files, or generated code
//! - **GOPATH and module layouts**: map import paths back to files on disk
//!
//! ## Example
//!
//! ```rust
//! use nocovlib::{GopathResolver, GoParser, ProcessOptions, Processor};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let gopath = tempdir().unwrap();
//! let pkg = gopath.path().join("src/example.com/f");
//! fs::create_dir_all(&pkg).unwrap();
//! fs::write(
//!     pkg.join("f.go"),
//!     "package f\n\nfunc F(x int) {\n\tif x < 0 {\n\t\t//nocoverage\n\t\tpanic(x)\n\t}\n}\n",
//! )
//! .unwrap();
//!
//! let profile = "mode: set\n\
//!                example.com/f/f.go:3.15,4.11 1 1\n\
//!                example.com/f/f.go:4.11,7.3 1 0\n";
//! let profiles = nocovlib::parse_profiles(profile.as_bytes(), "c.out".as_ref()).unwrap();
//!
//! let resolver = GopathResolver::new(vec![gopath.path().to_path_buf()]);
//! let parser = GoParser::new();
//! let mut out = Vec::new();
//! Processor::new(&resolver, &parser, ProcessOptions::new())
//!     .process(profiles, &mut out)
//!     .unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "mode: set\nexample.com/f/f.go:3.15,4.11 1 1\n"
//! );
//! ```

pub mod enclosure;
pub mod error;
pub mod ignore;
pub mod interval;
pub mod marker;
pub mod pipeline;
pub mod profile;
pub mod resolve;
pub mod rewrite;
pub mod syntax;

pub use enclosure::enclosing_interval;
pub use error::NocovError;
pub use ignore::{is_generated, IgnoreMatcher, PathPattern};
pub use interval::Interval;
pub use marker::{find_markers, Marker, DEFAULT_MARKER};
pub use pipeline::{filter_profile, FileSummary, ProcessOptions, Processor, RunSummary};
pub use profile::{
    format_profile, parse_profiles, read_profiles, Block, Mode, Profile, ProfileWriter,
};
pub use resolve::{GopathResolver, ModuleResolver, PathResolver};
pub use rewrite::{rewrite_blocks, DEFAULT_COVER_COUNT};
pub use syntax::{Comment, GoParser, GoSyntaxTree, SourceParser, SyntaxTree};

/// Result type for nocovlib operations
pub type Result<T> = std::result::Result<T, NocovError>;

//! Error types for nocovlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filtering a coverage profile
#[derive(Error, Debug)]
pub enum NocovError {
    /// Invalid ignore pattern given on the command line
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// Failed to read the coverage profile
    #[error("failed to open cover profile file '{path}': {source}")]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed coverage profile content
    #[error("bad cover profile '{path}' at line {line}: {message}")]
    ProfileParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A profile entry could not be mapped to a file on disk
    #[error("cannot locate source for '{file}': {message}")]
    PathResolution { file: String, message: String },

    /// No go.mod found at or above path
    #[error("no go.mod found at or above: {0}")]
    ModuleNotFound(PathBuf),

    /// Failed to read a source file
    #[error("failed to read go source file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source file is not valid Go
    #[error("failed to parse go source file '{path}': {message}")]
    SourceParse { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

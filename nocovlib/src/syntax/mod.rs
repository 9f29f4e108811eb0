//! Syntax trees, as far as marker resolution needs them.
//!
//! The engine never walks a concrete AST. It asks a [`SyntaxTree`] for two
//! things: the comments in the file, and the chain of nodes enclosing a byte
//! range. [`go::GoParser`] provides both for Go sources via tree-sitter; tests
//! and other languages can plug in their own implementation.

pub mod go;

use std::ops::Range;
use std::path::Path;

use crate::interval::Interval;
use crate::Result;

pub use go::{GoParser, GoSyntaxTree};

/// A comment token found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text including its delimiters (`// ...` or `/* ... */`)
    pub text: String,
    /// Position of the comment
    pub span: Interval,
    /// Byte offsets of the comment in the source
    pub bytes: Range<usize>,
}

/// A parsed source file.
pub trait SyntaxTree {
    /// All comments, in source order.
    fn comments(&self) -> Vec<Comment>;

    /// Spans of the syntactic constructs enclosing `bytes`, innermost first,
    /// ending with the whole file. Comment tokens themselves are never part
    /// of the path.
    fn path_enclosing(&self, bytes: Range<usize>) -> Vec<Interval>;
}

/// Turns source text into a [`SyntaxTree`].
pub trait SourceParser {
    /// Parse `source`, read from `path`. Invalid source is an error.
    fn parse(&self, path: &Path, source: &str) -> Result<Box<dyn SyntaxTree>>;
}

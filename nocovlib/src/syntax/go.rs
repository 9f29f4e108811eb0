//! Go source parsing with tree-sitter.

use std::ops::Range;
use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::{Comment, SourceParser, SyntaxTree};
use crate::error::NocovError;
use crate::interval::Interval;
use crate::Result;

/// Node kinds that never count as an enclosing construct.
///
/// Go's own AST has no node for a statement list, only for the braces around
/// it, so a marker inside a body resolves to the `{ ... }` block.
const TRANSPARENT_KINDS: &[&str] = &["comment", "statement_list"];

/// Parses Go source files.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for GoParser {
    fn parse(&self, path: &Path, source: &str) -> Result<Box<dyn SyntaxTree>> {
        Ok(Box::new(GoSyntaxTree::parse(path, source)?))
    }
}

/// A Go file parsed by tree-sitter, together with its source text.
pub struct GoSyntaxTree {
    tree: Tree,
    source: String,
}

impl GoSyntaxTree {
    /// Parse Go source. Files containing syntax errors are rejected.
    pub fn parse(path: &Path, source: &str) -> Result<Self> {
        let parse_error = |message: String| NocovError::SourceParse {
            path: path.to_path_buf(),
            message,
        };

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| parse_error(format!("failed to load Go grammar: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_error("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => {
                    let at = node_interval(&node);
                    format!("syntax error at {}:{}", at.start_line, at.start_col)
                }
                None => "syntax error".to_string(),
            };
            return Err(parse_error(message));
        }

        Ok(Self {
            tree,
            source: source.to_string(),
        })
    }
}

impl SyntaxTree for GoSyntaxTree {
    fn comments(&self) -> Vec<Comment> {
        let mut comments = Vec::new();
        let mut cursor = self.tree.walk();

        // Pre-order walk visits tokens in source order.
        loop {
            let node = cursor.node();
            if node.kind() == "comment" {
                comments.push(Comment {
                    text: self.source[node.byte_range()].to_string(),
                    span: node_interval(&node),
                    bytes: node.byte_range(),
                });
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return comments;
                }
            }
        }
    }

    fn path_enclosing(&self, bytes: Range<usize>) -> Vec<Interval> {
        let root = self.tree.root_node();
        let Some(mut node) = root.descendant_for_byte_range(bytes.start, bytes.end) else {
            return Vec::new();
        };

        let mut path = Vec::new();
        loop {
            if !TRANSPARENT_KINDS.contains(&node.kind()) {
                path.push(node_interval(&node));
            }
            match node.parent() {
                Some(parent) => node = parent,
                None => return path,
            }
        }
    }
}

/// Convert a node's 0-based points to a 1-based [`Interval`].
fn node_interval(node: &Node) -> Interval {
    let start = node.start_position();
    let end = node.end_position();
    Interval::new(start.row + 1, start.column + 1, end.row + 1, end.column + 1)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

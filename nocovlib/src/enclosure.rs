//! Resolving a marker to the construct it protects.

use crate::interval::Interval;
use crate::marker::Marker;
use crate::syntax::SyntaxTree;

/// Span of the innermost construct enclosing `marker`.
///
/// For a marker on its own line inside a function or branch body this is the
/// brace-delimited body. Returns `None` only if the tree reports no
/// enclosing node at all.
pub fn enclosing_interval(tree: &dyn SyntaxTree, marker: &Marker) -> Option<Interval> {
    tree.path_enclosing(marker.bytes.clone()).into_iter().next()
}

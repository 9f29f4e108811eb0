//! Locating marker comments.

use std::ops::Range;

use crate::interval::Interval;
use crate::syntax::{Comment, SyntaxTree};

/// Default marker prefix.
pub const DEFAULT_MARKER: &str = "//nocoverage";

/// A comment that marks its enclosing construct as intentionally untested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Full comment text
    pub text: String,
    /// Position of the comment
    pub span: Interval,
    /// Byte offsets of the comment in the source
    pub bytes: Range<usize>,
}

impl From<Comment> for Marker {
    fn from(comment: Comment) -> Self {
        Self {
            text: comment.text,
            span: comment.span,
            bytes: comment.bytes,
        }
    }
}

/// Collect the comments starting with `prefix`, in source order.
///
/// The match is a plain, case-sensitive prefix test on the comment text as
/// written, delimiters included: with the default prefix `// nocoverage`
/// (note the space) is not a marker.
pub fn find_markers(tree: &dyn SyntaxTree, prefix: &str) -> Vec<Marker> {
    tree.comments()
        .into_iter()
        .filter(|comment| comment.text.starts_with(prefix))
        .map(Marker::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::GoSyntaxTree;
    use std::path::Path;

    const SOURCE: &str = "package f

//nocoverage: whole file
func a() {
\t// nocoverage
\t//NOCOVERAGE
\t//nocoverage
}

/*nocoverage*/
func b() {}
";

    fn markers(prefix: &str) -> Vec<Marker> {
        let tree = GoSyntaxTree::parse(Path::new("f.go"), SOURCE).unwrap();
        find_markers(&tree, prefix)
    }

    #[test]
    fn test_default_prefix() {
        let found = markers(DEFAULT_MARKER);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "//nocoverage: whole file");
        assert_eq!(found[0].span.start_line, 3);
        assert_eq!(found[1].text, "//nocoverage");
        assert_eq!(found[1].span.start_line, 7);
    }

    #[test]
    fn test_custom_prefix() {
        let found = markers("/*nocoverage");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.start_line, 10);
    }

    #[test]
    fn test_no_markers() {
        assert!(markers("//untested").is_empty());
    }
}

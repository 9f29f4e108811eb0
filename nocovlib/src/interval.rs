//! Source spans expressed as (line, column) pairs.
//!
//! Both coverage blocks and syntax nodes are compared through [`Interval`],
//! so the containment rule lives in exactly one place.

/// A span of source text from `(start_line, start_col)` to
/// `(end_line, end_col)`. Lines and columns are 1-based; the end column
/// points one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Interval {
    /// Create a new interval.
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Check whether `inner` lies entirely within this interval.
    ///
    /// Shared boundaries count as contained, so every interval contains
    /// itself. An interval that merely overlaps is not contained.
    pub fn contains(&self, inner: &Interval) -> bool {
        let starts_inside = inner.start_line > self.start_line
            || (inner.start_line == self.start_line && inner.start_col >= self.start_col);
        let ends_inside = inner.end_line < self.end_line
            || (inner.end_line == self.end_line && inner.end_col <= self.end_col);

        starts_inside && ends_inside
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{},{}.{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_itself() {
        let span = Interval::new(1, 5, 10, 10);
        assert!(span.contains(&span));
    }

    #[test]
    fn test_contains_inner_lines() {
        let outer = Interval::new(1, 5, 10, 5);
        assert!(outer.contains(&Interval::new(2, 5, 9, 5)));
    }

    #[test]
    fn test_start_column_before_outer() {
        let outer = Interval::new(1, 5, 10, 5);
        assert!(!outer.contains(&Interval::new(1, 4, 10, 5)));
    }

    #[test]
    fn test_end_column_after_outer() {
        let outer = Interval::new(1, 5, 10, 5);
        assert!(!outer.contains(&Interval::new(1, 5, 10, 6)));
    }

    #[test]
    fn test_start_line_before_outer() {
        let outer = Interval::new(2, 5, 10, 5);
        assert!(!outer.contains(&Interval::new(1, 5, 10, 5)));
    }

    #[test]
    fn test_end_line_after_outer() {
        let outer = Interval::new(1, 5, 10, 5);
        assert!(!outer.contains(&Interval::new(1, 5, 11, 5)));
    }

    #[test]
    fn test_disjoint_lines() {
        let first = Interval::new(1, 5, 5, 5);
        let second = Interval::new(6, 5, 10, 5);

        assert!(!first.contains(&second));
        assert!(!second.contains(&first));
    }

    #[test]
    fn test_disjoint_columns_on_shared_line() {
        let first = Interval::new(1, 5, 5, 5);
        let second = Interval::new(5, 6, 10, 5);

        assert!(!first.contains(&second));
        assert!(!second.contains(&first));
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::new(3, 1, 4, 12).to_string(), "3.1,4.12");
    }
}

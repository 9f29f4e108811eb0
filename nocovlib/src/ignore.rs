//! Whole-file exclusion rules.
//!
//! Besides marker comments, entire files can be dropped from the report:
//!
//! - **Directories**: a pattern tested against the file's directory and each
//!   of its ancestors (`^vendor$` drops everything below `vendor/`)
//! - **Files**: a pattern tested against the logical file name
//! - **Generated code**: files whose header says they were generated
//!
//! Verdicts are memoized per file name for the lifetime of the matcher.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::NocovError;
use crate::Result;

/// How many leading bytes of a file are inspected for a generated-code header.
pub const GENERATED_HEADER_LIMIT: usize = 256;

fn generated_header() -> &'static regex::bytes::Regex {
    static GENERATED: OnceLock<regex::bytes::Regex> = OnceLock::new();
    GENERATED.get_or_init(|| {
        regex::bytes::Regex::new(r"(?im)^//.*(?:code generated|do not edit|autogenerated file)")
            .expect("generated header pattern is valid")
    })
}

/// Check whether the start of a file marks it as generated.
pub fn is_generated(content: &[u8]) -> bool {
    let head = &content[..content.len().min(GENERATED_HEADER_LIMIT)];
    generated_header().is_match(head)
}

/// A pattern that can be tested against a path string.
pub trait PathPattern {
    fn is_match(&self, path: &str) -> bool;
}

impl PathPattern for Regex {
    fn is_match(&self, path: &str) -> bool {
        Regex::is_match(self, path)
    }
}

/// Outcome of evaluating the rules for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ignored,
    Kept,
    /// Generated-file detection is on but no content was supplied
    Indeterminate,
}

/// Decides which files are left out of the coverage report entirely.
#[derive(Debug)]
pub struct IgnoreMatcher<P: PathPattern = Regex> {
    dirs: Option<P>,
    files: Option<P>,
    generated_files: bool,
    cache: HashMap<String, bool>,
}

impl IgnoreMatcher<Regex> {
    /// Create a matcher that ignores nothing.
    pub fn new() -> Self {
        Self::from_patterns(None, None)
    }

    /// Ignore files in directories (or below directories) matching `pattern`.
    pub fn dirs(mut self, pattern: &str) -> Result<Self> {
        self.dirs = Some(compile(pattern)?);
        Ok(self)
    }

    /// Ignore files whose name matches `pattern`.
    pub fn files(mut self, pattern: &str) -> Result<Self> {
        self.files = Some(compile(pattern)?);
        Ok(self)
    }
}

impl Default for IgnoreMatcher<Regex> {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| NocovError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

impl<P: PathPattern> IgnoreMatcher<P> {
    /// Create a matcher from already-built patterns.
    pub fn from_patterns(dirs: Option<P>, files: Option<P>) -> Self {
        Self {
            dirs,
            files,
            generated_files: false,
            cache: HashMap::new(),
        }
    }

    /// Builder: enable or disable generated-file detection
    pub fn generated_files(mut self, enabled: bool) -> Self {
        self.generated_files = enabled;
        self
    }

    /// Whether any rule is configured at all.
    pub fn is_active(&self) -> bool {
        self.dirs.is_some() || self.files.is_some() || self.generated_files
    }

    /// Whether evaluating this file needs its content.
    pub fn wants_content(&self) -> bool {
        self.generated_files
    }

    /// Decide whether `file_name` should be dropped from the report.
    ///
    /// `content` is only consulted for generated-file detection. When that
    /// detection is enabled and no content is given the answer is `false`
    /// and is not remembered, so a later call with content still decides.
    pub fn should_ignore(&mut self, file_name: &str, content: Option<&[u8]>) -> bool {
        if let Some(&cached) = self.cache.get(file_name) {
            return cached;
        }

        match self.evaluate(file_name, content) {
            Verdict::Ignored => {
                self.cache.insert(file_name.to_string(), true);
                true
            }
            Verdict::Kept => {
                self.cache.insert(file_name.to_string(), false);
                false
            }
            Verdict::Indeterminate => false,
        }
    }

    fn evaluate(&self, file_name: &str, content: Option<&[u8]>) -> Verdict {
        if self.dir_matches(parent_dir(file_name)) {
            return Verdict::Ignored;
        }

        if self.files.as_ref().is_some_and(|p| p.is_match(file_name)) {
            return Verdict::Ignored;
        }

        if self.generated_files {
            return match content {
                None => Verdict::Indeterminate,
                Some(data) if is_generated(data) => Verdict::Ignored,
                Some(_) => Verdict::Kept,
            };
        }

        Verdict::Kept
    }

    /// Test `dir` and each of its ancestors against the directory pattern.
    fn dir_matches(&self, mut dir: &str) -> bool {
        let Some(pattern) = &self.dirs else {
            return false;
        };

        loop {
            if pattern.is_match(dir) {
                return true;
            }
            match dir.rfind('/') {
                Some(index) => dir = &dir[..index],
                None => return false,
            }
        }
    }
}

/// Directory part of a `/`-separated logical file name.
fn parent_dir(file_name: &str) -> &str {
    match file_name.rfind('/') {
        Some(0) => "/",
        Some(index) => &file_name[..index],
        None => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Regex wrapper that counts evaluations.
    struct Counting {
        inner: Regex,
        calls: Rc<Cell<usize>>,
    }

    impl Counting {
        fn new(pattern: &str) -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let pattern = Self {
                inner: Regex::new(pattern).unwrap(),
                calls: Rc::clone(&calls),
            };
            (pattern, calls)
        }
    }

    impl PathPattern for Counting {
        fn is_match(&self, path: &str) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.inner.is_match(path)
        }
    }

    const GENERATED: &[u8] = b"// Code generated by x; DO NOT EDIT.\n\npackage x\n";

    #[test]
    fn test_nothing_configured() {
        let mut matcher = IgnoreMatcher::new();

        assert!(!matcher.is_active());
        assert!(!matcher.should_ignore("vendor/pkg/file.go", Some(GENERATED)));
    }

    #[test]
    fn test_dir_pattern_walks_ancestors() {
        let mut matcher = IgnoreMatcher::new().dirs("^vendor$").unwrap();

        assert!(matcher.should_ignore("vendor/pkg/file.go", None));
        assert!(!matcher.should_ignore("src/vendors/file.go", None));
        assert!(!matcher.should_ignore("file.go", None));
    }

    #[test]
    fn test_dir_pattern_checks_walked_prefixes_only() {
        let (pattern, calls) = Counting::new("^pkg$");
        let mut matcher = IgnoreMatcher::from_patterns(Some(pattern), None);

        // "vendor/pkg", then "vendor": never the bare "pkg" segment.
        assert!(!matcher.should_ignore("vendor/pkg/file.go", None));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let mut matcher = IgnoreMatcher::new().dirs(r"^\.$").unwrap();

        assert!(matcher.should_ignore("main.go", None));
        assert!(!matcher.should_ignore("cmd/main.go", None));
    }

    #[test]
    fn test_file_pattern() {
        let mut matcher = IgnoreMatcher::new().files(r"_mock\.go$").unwrap();

        assert!(matcher.should_ignore("pkg/store_mock.go", None));
        assert!(!matcher.should_ignore("pkg/store.go", None));
    }

    #[test]
    fn test_dir_pattern_wins_over_file_pattern() {
        let (files, file_calls) = Counting::new(".*");
        let dirs = Counting::new("^internal$").0;
        let mut matcher = IgnoreMatcher::from_patterns(Some(dirs), Some(files));

        assert!(matcher.should_ignore("internal/x.go", None));
        assert_eq!(file_calls.get(), 0);
    }

    #[test]
    fn test_generated_file_detection() {
        let mut enabled = IgnoreMatcher::new().generated_files(true);
        let mut disabled = IgnoreMatcher::new();

        assert!(enabled.should_ignore("pkg/gen.go", Some(GENERATED)));
        assert!(!disabled.should_ignore("pkg/gen.go", Some(GENERATED)));
    }

    #[test]
    fn test_generated_header_is_case_insensitive() {
        assert!(is_generated(b"// code GENERATED by protoc\npackage x\n"));
        assert!(is_generated(b"package x\n\n// Autogenerated File\n"));
        assert!(!is_generated(b"package x\n\n/* Code generated */\n"));
        assert!(!is_generated(b"package x\n\nfunc f() {}\n"));
    }

    #[test]
    fn test_generated_header_beyond_limit() {
        let mut content = vec![b'\n'; GENERATED_HEADER_LIMIT];
        content.extend_from_slice(GENERATED);

        assert!(!is_generated(&content));
    }

    #[test]
    fn test_missing_content_is_not_cached() {
        let mut matcher = IgnoreMatcher::new().generated_files(true);

        assert!(!matcher.should_ignore("pkg/gen.go", None));
        assert!(matcher.should_ignore("pkg/gen.go", Some(GENERATED)));
        // Now cached: content no longer matters.
        assert!(matcher.should_ignore("pkg/gen.go", None));
    }

    #[test]
    fn test_cached_verdict_skips_patterns() {
        let (files, calls) = Counting::new(r"_test\.go$");
        let mut matcher = IgnoreMatcher::from_patterns(None, Some(files));

        let first = matcher.should_ignore("pkg/a_test.go", None);
        let evaluations = calls.get();
        let second = matcher.should_ignore("pkg/a_test.go", None);

        assert!(first);
        assert_eq!(first, second);
        assert_eq!(calls.get(), evaluations);
    }

    #[test]
    fn test_cached_negative_verdict() {
        let (dirs, calls) = Counting::new("^vendor$");
        let mut matcher = IgnoreMatcher::from_patterns(Some(dirs), None);

        assert!(!matcher.should_ignore("pkg/a.go", Some(b"package pkg\n")));
        let evaluations = calls.get();
        assert!(!matcher.should_ignore("pkg/a.go", Some(b"package pkg\n")));
        assert_eq!(calls.get(), evaluations);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = IgnoreMatcher::new().dirs("(unclosed");

        match result {
            Err(NocovError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern error, got {:?}", other.map(|_| ())),
        }
    }
}

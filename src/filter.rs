//! Entry-name selection using wildcard or regular-expression patterns.
//!
//! A [`PathFilter`] is compiled once per invocation from a [`FilterSpec`] and
//! reused for every entry of every archive in a run. Compilation failures are
//! configuration errors surfaced before any file is touched.
//!
//! Wildcard matching is path-aware: `*` does not cross `/`, `**` does.
//!
//! ```rust
//! use ziped::filter::{FilterSpec, PathFilter};
//!
//! let filter = PathFilter::compile(&FilterSpec::wildcard("*.txt")).unwrap();
//! assert!(filter.matches("readme.txt"));
//! assert!(!filter.matches("docs/readme.txt"));
//! ```

use glob::{MatchOptions, Pattern};
use regex::Regex;

use crate::{Error, Result};

/// Selection rule for entry names, at most one of wildcard or regex.
///
/// When both are supplied the regular expression takes precedence.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Wildcard pattern (`*` stays within one path segment, `**` crosses).
    pub pattern: Option<String>,
    /// Regular expression, matched unanchored against the entry name.
    pub regexp: Option<String>,
}

impl FilterSpec {
    /// Creates a spec with only a wildcard pattern.
    pub fn wildcard(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            regexp: None,
        }
    }

    /// Creates a spec with only a regular expression.
    pub fn regex(regexp: impl Into<String>) -> Self {
        Self {
            pattern: None,
            regexp: Some(regexp.into()),
        }
    }
}

#[derive(Clone, Debug)]
enum Matcher {
    /// No selector configured; matches every entry.
    All,
    Wildcard(Pattern),
    Regex(Regex),
}

/// A compiled predicate over entry names.
///
/// Pure and immutable once built, so it can be shared by reference across
/// concurrent workers or cheaply cloned per use.
#[derive(Clone, Debug)]
pub struct PathFilter {
    matcher: Matcher,
}

/// Path-aware glob semantics: a literal `/` is never matched by `*` or `?`.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl PathFilter {
    /// Compiles a filter from the given spec.
    ///
    /// The regular expression takes precedence over the wildcard when both
    /// are set. With neither set the filter matches everything; operations
    /// that require an explicit target must call [`require_explicit`]
    /// before using such a filter.
    ///
    /// [`require_explicit`]: PathFilter::require_explicit
    pub fn compile(spec: &FilterSpec) -> Result<Self> {
        let matcher = if let Some(expr) = spec.regexp.as_deref().filter(|s| !s.is_empty()) {
            let regex = Regex::new(expr).map_err(|e| Error::InvalidRegex {
                pattern: expr.to_string(),
                reason: e.to_string(),
            })?;
            Matcher::Regex(regex)
        } else if let Some(pat) = spec.pattern.as_deref().filter(|s| !s.is_empty()) {
            let pattern = Pattern::new(pat).map_err(|e| Error::InvalidPattern {
                pattern: pat.to_string(),
                reason: e.to_string(),
            })?;
            Matcher::Wildcard(pattern)
        } else {
            Matcher::All
        };

        Ok(Self { matcher })
    }

    /// Checks whether an entry name matches the selection rule.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Wildcard(pattern) => pattern.matches_with(name, GLOB_OPTIONS),
            Matcher::Regex(regex) => regex.is_match(name),
        }
    }

    /// Returns whether an explicit selector was configured.
    pub fn is_explicit(&self) -> bool {
        !matches!(self.matcher, Matcher::All)
    }

    /// Fails with [`Error::SelectorRequired`] unless an explicit selector was
    /// configured.
    ///
    /// Used by operations (such as removal) that must never default to
    /// matching every entry.
    pub fn require_explicit(&self) -> Result<()> {
        if self.is_explicit() {
            Ok(())
        } else {
            Err(Error::SelectorRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_by_default() {
        let filter = PathFilter::compile(&FilterSpec::default()).unwrap();
        assert!(filter.matches("anything.txt"));
        assert!(filter.matches("any/path/file.ext"));
        assert!(!filter.is_explicit());
        assert!(matches!(
            filter.require_explicit(),
            Err(Error::SelectorRequired)
        ));
    }

    #[test]
    fn test_wildcard_does_not_cross_separator() {
        let filter = PathFilter::compile(&FilterSpec::wildcard("*.txt")).unwrap();
        assert!(filter.matches("readme.txt"));
        assert!(!filter.matches("dir/readme.txt"));
    }

    #[test]
    fn test_double_star_crosses_separator() {
        let filter = PathFilter::compile(&FilterSpec::wildcard("**/*.txt")).unwrap();
        assert!(filter.matches("dir/readme.txt"));
        assert!(filter.matches("a/b/c/readme.txt"));

        let filter = PathFilter::compile(&FilterSpec::wildcard("docs/*")).unwrap();
        assert!(filter.matches("docs/manual.pdf"));
        assert!(!filter.matches("docs/sub/manual.pdf"));
    }

    #[test]
    fn test_regex_matching() {
        let filter = PathFilter::compile(&FilterSpec::regex(r"\.te?xt$")).unwrap();
        assert!(filter.matches("readme.txt"));
        assert!(filter.matches("deep/nested/readme.text"));
        assert!(!filter.matches("readme.md"));
        assert!(filter.is_explicit());
    }

    #[test]
    fn test_regex_takes_precedence_over_wildcard() {
        let spec = FilterSpec {
            pattern: Some("*.txt".to_string()),
            regexp: Some(r"\.md$".to_string()),
        };
        let filter = PathFilter::compile(&spec).unwrap();
        assert!(filter.matches("notes.md"));
        assert!(!filter.matches("notes.txt"));
    }

    #[test]
    fn test_invalid_regex_is_configuration_error() {
        let err = PathFilter::compile(&FilterSpec::regex("(")).unwrap_err();
        assert!(matches!(err, Error::InvalidRegex { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_wildcard_is_configuration_error() {
        let err = PathFilter::compile(&FilterSpec::wildcard("[")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_strings_treated_as_unset() {
        let spec = FilterSpec {
            pattern: Some(String::new()),
            regexp: Some(String::new()),
        };
        let filter = PathFilter::compile(&spec).unwrap();
        assert!(!filter.is_explicit());
    }
}

//! Wildcard filters over container contents.

use regex::{Regex, RegexBuilder};

use crate::error::{NavError, NavResult};

/// A compiled, case-insensitive wildcard pattern matched against node titles.
///
/// `*` stands for any run of characters. The rest of the pattern is passed to
/// the regex engine as written. A pattern that does not start with `*` is
/// anchored at the start of the title, and one that does not end with `*` is
/// anchored at its end.
#[derive(Debug, Clone)]
pub struct WildcardFilter {
    pattern: String,
    regex: Regex,
}

impl WildcardFilter {
    /// Compile a pattern. Returns `None` for a blank pattern.
    pub fn compile(pattern: &str) -> NavResult<Option<Self>> {
        if pattern.trim().is_empty() {
            return Ok(None);
        }

        let regex = RegexBuilder::new(&translate(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|source| NavError::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Some(Self {
            pattern: pattern.to_string(),
            regex,
        }))
    }

    /// The pattern as the user supplied it.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether a title matches.
    pub fn matches(&self, title: &str) -> bool {
        self.regex.is_match(&title.to_lowercase())
    }
}

/// Turn a wildcard pattern into an anchored regular expression.
fn translate(pattern: &str) -> String {
    let body = pattern.replace('*', ".*");
    let start = if pattern.starts_with('*') { "" } else { "^" };
    let end = if pattern.ends_with('*') { "" } else { "$" };
    format!("{start}(?s:{body}){end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pattern_is_unfiltered() {
        assert!(WildcardFilter::compile("").unwrap().is_none());
        assert!(WildcardFilter::compile("  ").unwrap().is_none());
    }

    #[test]
    fn test_translate_anchors_unstarred_ends() {
        assert_eq!(translate("A*"), "^(?s:A.*)");
        assert_eq!(translate("*a"), "(?s:.*a)$");
        assert_eq!(translate("*a*"), "(?s:.*a.*)");
        assert_eq!(translate("a*b"), "^(?s:a.*b)$");
    }

    #[test]
    fn test_prefix_pattern_is_case_insensitive() {
        let filter = WildcardFilter::compile("A*").unwrap().unwrap();
        assert!(filter.matches("Apple"));
        assert!(filter.matches("avocado"));
        assert!(!filter.matches("Banana"));
    }

    #[test]
    fn test_surrounding_stars_match_anywhere() {
        let filter = WildcardFilter::compile("*APP*").unwrap().unwrap();
        assert!(filter.matches("Pineapple"));
        assert!(!filter.matches("Pear"));

        let filter = WildcardFilter::compile("pear").unwrap().unwrap();
        assert!(filter.matches("Pear"));
        assert!(!filter.matches("Pears"));
    }

    #[test]
    fn test_unescaped_metacharacters_keep_regex_meaning() {
        let filter = WildcardFilter::compile("a.c").unwrap().unwrap();
        assert!(filter.matches("abc"));
        assert!(filter.matches("a.c"));
        assert!(!filter.matches("ac"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = WildcardFilter::compile("(unclosed").unwrap_err();
        assert!(matches!(err, NavError::InvalidFilter { .. }));
    }
}

//! Classification of problem-page URLs.

use regex::RegexSet;

/// Patterns tracked when no configuration overrides them.
pub const DEFAULT_PATTERNS: [&str; 2] = [r"leetcode\.com/problems/", r"geeksforgeeks\.org/problems/"];

/// Allow-list of problem-page URL patterns.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    set: RegexSet,
}

impl UrlMatcher {
    /// Compiles `patterns` as regular expressions. An empty list tracks nothing.
    pub fn new<I, P>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    pub fn is_trackable(&self, url: &str) -> bool {
        self.set.is_match(url)
    }

    pub fn patterns(&self) -> &[String] {
        self.set.patterns()
    }
}

impl Default for UrlMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS).expect("default patterns are valid")
    }
}

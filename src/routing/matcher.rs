//! Path prefix matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Plain string prefix comparison; no segment boundary check, so `/grokx`
//!   matches `/grok`
//! - No regex to guarantee O(n) matching

/// Matches, and strips, a literal path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if the path starts with this prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Remainder of the path after the prefix, if it matched.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/grok");

        assert!(matcher.matches("/grok/rest"));
        assert!(matcher.matches("/grokking"));
        assert!(!matcher.matches("/Grok/rest"));
        assert!(!matcher.matches("/assets"));
    }

    #[test]
    fn test_strip() {
        let matcher = PathPrefixMatcher::new("/assets");

        assert_eq!(matcher.strip("/assets/users/a.png"), Some("/users/a.png"));
        assert_eq!(matcher.strip("/assets"), Some(""));
        assert_eq!(matcher.strip("/grok"), None);
    }
}

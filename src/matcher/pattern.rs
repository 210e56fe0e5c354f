//! Pattern set implementation.

use regex::Regex;

use crate::error::VanityError;

/// An ordered conjunction of compiled regular expressions.
///
/// Immutable once built, so workers share it through an `Arc` without any
/// locking.
#[derive(Debug, Clone)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Compiles every pattern in order.
    ///
    /// Fails on an empty list or on the first pattern that does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, VanityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regexes = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| VanityError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if regexes.is_empty() {
            return Err(VanityError::EmptyPatternSet);
        }

        Ok(Self { regexes })
    }

    /// Returns true if every pattern matches `text`.
    ///
    /// Stops at the first pattern that does not match.
    #[inline]
    pub fn matches_all(&self, text: &str) -> bool {
        self.regexes.iter().all(|re| re.is_match(text))
    }

    /// Returns the source strings of the patterns, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.regexes.iter().map(Regex::as_str)
    }

    /// Returns the number of patterns in the set.
    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    /// Always false for a successfully built set.
    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let set = PatternSet::new(["^RWQ"]).unwrap();
        assert!(set.matches_all("RWQdeadbeef"));
        assert!(!set.matches_all("RWTdeadbeef"));
    }

    #[test]
    fn test_all_patterns_required() {
        let set = PatternSet::new(["^RW", "cafe", "[0-9]$"]).unwrap();
        assert!(set.matches_all("RWxxcafexx7"));
        assert!(!set.matches_all("RWxxcafexxZ"));
        assert!(!set.matches_all("RWxxbeefxx7"));
    }

    #[test]
    fn test_repeated_match_is_stable() {
        let set = PatternSet::new(["(?i)abc", "^[A-Z]"]).unwrap();
        for text in ["ABC", "Xabc", "abc", ""] {
            assert_eq!(set.matches_all(text), set.matches_all(text));
        }
        assert!(set.matches_all("Xabc"));
        assert!(!set.matches_all("abc"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = PatternSet::new(["^RW", "(unclosed", "x"]).unwrap_err();
        match err {
            VanityError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_set_rejected() {
        let patterns: [&str; 0] = [];
        assert!(matches!(
            PatternSet::new(patterns),
            Err(VanityError::EmptyPatternSet)
        ));
    }

    #[test]
    fn test_patterns_preserve_order() {
        let set = PatternSet::new(vec!["b".to_string(), "a".to_string()]).unwrap();
        assert_eq!(set.patterns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }
}

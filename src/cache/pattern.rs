//! Invalidation Pattern Module
//!
//! Selects which keys an invalidation removes.

use regex::Regex;

use crate::error::Result;

// == Invalidation Pattern ==
/// A literal substring or a regular expression matched against keys.
#[derive(Debug, Clone)]
pub enum InvalidationPattern {
    /// Matches every key containing the substring
    Substring(String),
    /// Matches every key the expression finds a match in
    Regex(Regex),
}

impl InvalidationPattern {
    /// Compiles a regular expression pattern.
    ///
    /// # Errors
    /// Returns `InvalidPattern` when the expression does not compile.
    pub fn regex(expr: &str) -> Result<Self> {
        Ok(Self::Regex(Regex::new(expr)?))
    }

    /// Returns true if `key` is selected by this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Substring(needle) => key.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for InvalidationPattern {
    fn from(value: &str) -> Self {
        Self::Substring(value.to_string())
    }
}

impl From<String> for InvalidationPattern {
    fn from(value: String) -> Self {
        Self::Substring(value)
    }
}

impl From<Regex> for InvalidationPattern {
    fn from(value: Regex) -> Self {
        Self::Regex(value)
    }
}

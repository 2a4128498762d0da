//! Cascade Table Module
//!
//! Maps a written URL path fragment to the fragments whose cached responses
//! may embed the written data.
//!
//! This is a coarse string match on URL shape, not a dependency graph: only
//! the first rule whose fragment appears in the key is applied, and families
//! that are not listed stay cached until they expire.

// == Cascade Rule ==
/// One fragment and the families that depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeRule {
    pub fragment: String,
    pub related: Vec<String>,
}

// == Cascade Table ==
/// Ordered list of cascade rules, searched front to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeTable {
    rules: Vec<CascadeRule>,
}

impl CascadeTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule; earlier rules win.
    pub fn with_rule<I, S>(mut self, fragment: impl Into<String>, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push(CascadeRule {
            fragment: fragment.into(),
            related: related.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the related fragments of the first rule contained in `key`.
    pub fn related_to(&self, key: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|rule| key.contains(rule.fragment.as_str()))
            .map(|rule| rule.related.as_slice())
    }

    pub fn rules(&self) -> &[CascadeRule] {
        &self.rules
    }
}

impl Default for CascadeTable {
    fn default() -> Self {
        Self::empty()
            .with_rule("/users", ["/follows", "/posts", "/notifications"])
            .with_rule("/posts", ["/feed", "/comments", "/likes"])
            .with_rule("/follows", ["/users", "/feed"])
            .with_rule("/comments", ["/posts"])
            .with_rule("/likes", ["/posts"])
            .with_rule("/notifications", Vec::<String>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_users_cascade() {
        let table = CascadeTable::default();
        let related = table.related_to("PUT:/api/users/7").unwrap();
        assert_eq!(related, ["/follows", "/posts", "/notifications"]);
    }

    #[test]
    fn test_first_match_wins() {
        let table = CascadeTable::default();
        // contains both /users and /posts; /users is listed first
        let related = table.related_to("GET:/api/users/7/posts").unwrap();
        assert_eq!(related[0], "/follows");
    }

    #[test]
    fn test_no_match() {
        let table = CascadeTable::default();
        assert!(table.related_to("GET:/api/settings").is_none());
    }

    #[test]
    fn test_custom_table() {
        let table = CascadeTable::empty().with_rule("/orders", ["/invoices"]);
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.related_to("/orders/1").unwrap(), ["/invoices"]);
        assert!(table.related_to("/users/1").is_none());
    }
}

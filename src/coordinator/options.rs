//! Per-call resolution options.

use std::time::Duration;

/// Options for a single `resolve` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Skip the cache read; a successful result is still written back
    pub skip_cache: bool,
    /// TTL for the written entry, overriding the store default
    pub ttl: Option<Duration>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a fetch even when a fresh entry exists.
    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reads_cache() {
        let options = ResolveOptions::default();
        assert!(!options.skip_cache);
        assert!(options.ttl.is_none());
    }

    #[test]
    fn test_builder() {
        let options = ResolveOptions::new()
            .skip_cache()
            .with_ttl(Duration::from_secs(5));
        assert!(options.skip_cache);
        assert_eq!(options.ttl, Some(Duration::from_secs(5)));
    }
}

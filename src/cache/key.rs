//! Cache Key Module
//!
//! Derives deterministic keys from request parts.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Cache Key ==
/// A deterministic string identifying one logical request.
///
/// Built from `METHOD:url:headers:body`, where headers are lower-cased and
/// ordered by name before serialization and the body is its JSON encoding
/// (empty when absent). Equal requests produce equal keys regardless of the
/// order headers were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from request parts.
    ///
    /// # Errors
    /// Returns `KeyComputation` when the body cannot be serialized.
    pub fn new<K, V, B>(
        method: &str,
        url: &str,
        headers: impl IntoIterator<Item = (K, V)>,
        body: Option<&B>,
    ) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        B: Serialize + ?Sized,
    {
        let headers: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.as_ref().to_string()))
            .collect();
        let headers = serde_json::to_string(&headers)
            .map_err(|e| CacheError::KeyComputation(format!("headers: {}", e)))?;

        let body = match body {
            Some(body) => serde_json::to_string(body)
                .map_err(|e| CacheError::KeyComputation(format!("body: {}", e)))?,
            None => String::new(),
        };

        Ok(Self(format!(
            "{}:{}:{}:{}",
            method.to_ascii_uppercase(),
            url,
            headers,
            body
        )))
    }

    /// Wraps an already-computed key string.
    pub fn raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        Self::raw(value)
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        Self::raw(value)
    }
}

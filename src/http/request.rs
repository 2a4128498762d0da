//! Request description used for both key derivation and sending.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;

use crate::cache::CacheKey;
use crate::error::Result;

/// An HTTP request the fetcher can key and send.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Adds a header; names are case-insensitive.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Derives the cache key for this request.
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::new(
            self.method.as_str(),
            &self.url,
            self.headers.iter(),
            self.body.as_ref(),
        )
    }
}

//! HTTP Module
//!
//! Convenience variant that performs the HTTP call itself and caches the
//! decoded JSON body through a `RequestCoordinator`.

mod fetcher;
mod request;

pub use fetcher::{FetchError, HttpFetcher};
pub use request::HttpRequest;

//! HTTP fetcher backed by reqwest.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::coordinator::{RequestCoordinator, ResolveOptions};
use crate::error::Result;
use crate::http::HttpRequest;

// == Fetch Error ==
/// Failures of the HTTP convenience variant.
///
/// Delivered to callers inside `CacheError::Operation`; recover it with
/// `err.operation_error().and_then(|e| e.downcast_ref::<FetchError>())`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("request to {url} failed with status {status}")]
    Status { status: StatusCode, url: String },

    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not valid JSON for the requested type
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

// == HTTP Fetcher ==
/// Performs HTTP requests through a coordinator so identical concurrent
/// requests share one network call and successful bodies are cached.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Resolves `request` through `cache`, decoding the JSON body into `T`.
    ///
    /// # Errors
    /// `KeyComputation` if the request cannot be keyed; otherwise failures
    /// arrive as `CacheError::Operation` wrapping a `FetchError`.
    pub async fn fetch_json<T>(
        &self,
        cache: &RequestCoordinator<T>,
        request: HttpRequest,
        options: ResolveOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = request.cache_key()?;
        let client = self.client.clone();

        cache
            .resolve(
                &key,
                move || async move { Ok(send(&client, request).await?) },
                options,
            )
            .await
    }
}

async fn send<T: DeserializeOwned>(
    client: &Client,
    request: HttpRequest,
) -> std::result::Result<T, FetchError> {
    let mut builder = client.request(request.method.clone(), &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    debug!(method = %request.method, url = %request.url, %status, "http response");

    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: request.url,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

//! Outbound HTTP client adapter.
//!
//! Call sites depend on the `HttpAdapter` trait only, so tests can swap in
//! a fake or point the real client at a mock server.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from outbound GET requests.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The body was not the expected JSON shape.
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// GET-only JSON client.
#[async_trait]
pub trait HttpAdapter: Send + Sync {
    /// Fetch `url` and return the decoded JSON body.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HttpError>;
}

impl dyn HttpAdapter {
    /// Fetch `url` and decode the body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let value = self.get_json(url).await?;
        serde_json::from_value(value).map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// `HttpAdapter` backed by reqwest with default transport settings.
#[derive(Debug, Clone, Default)]
pub struct ReqwestAdapter {
    client: reqwest::Client,
}

impl ReqwestAdapter {
    /// Create a new adapter.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HttpError> {
        debug!(url = %url, "GET");

        let transport = |source| HttpError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, body = %body, "GET returned non-success status");
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

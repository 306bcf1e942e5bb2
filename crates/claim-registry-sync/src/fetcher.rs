//! Remote document retrieval
//!
//! One fetch is exactly one HTTP GET. There is no retry, caching or
//! conditional request here; the scheduler's poll cadence is the retry.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Client, StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::RegistryLocation;
use crate::error::{ConfigError, FetchError};

/// Retrieves the raw registry document
#[async_trait]
pub trait RegistryFetcher: Send + Sync {
    /// Fetch the document at `location`, authenticating with `credential` if given
    async fn fetch(
        &self,
        location: &RegistryLocation,
        credential: Option<&SecretString>,
    ) -> Result<Vec<u8>, FetchError>;
}

/// HTTP implementation of [`RegistryFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("claim-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RegistryFetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %location.url()))]
    async fn fetch(
        &self,
        location: &RegistryLocation,
        credential: Option<&SecretString>,
    ) -> Result<Vec<u8>, FetchError> {
        let url = location.url();
        let mut request = self.client.get(&url);

        if let Some(token) = credential {
            let mut value = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
                .map_err(|_| FetchError::InvalidCredential)?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Body {
                url: url.clone(),
                source,
            })?;

        debug!(bytes = body.len(), "Fetched registry document");
        Ok(body.to_vec())
    }
}

//! Default [`SourceFetcher`] reading from the filesystem or over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::fs;
use tracing::debug;

use crate::ports::{PortError, SourceFetcher};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_IDLE_PER_HOST: usize = 10;

/// Fetches `http://` and `https://` sources with `reqwest` and everything else from disk.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    client: Client,
}

impl DefaultFetcher {
    /// Create a fetcher bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a fetcher with the aggregator's default client settings.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Internal`] when the HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, PortError> {
        let client = Client::builder()
            .user_agent("koala/0.1")
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(|err| PortError::Internal(err.to_string()))?;
        Ok(Self::new(client))
    }

    async fn get_http(&self, url: &str) -> Result<Vec<u8>, PortError> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PortError::fetch(url, err))?
            .error_for_status()
            .map_err(|err| PortError::fetch(url, err))?
            .bytes()
            .await
            .map_err(|err| PortError::fetch(url, err))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SourceFetcher for DefaultFetcher {
    async fn get(&self, source: &str) -> Result<Vec<u8>, PortError> {
        let bytes = if is_http(source) {
            self.get_http(source).await?
        } else {
            fs::read(source)
                .await
                .map_err(|err| PortError::fetch(source, err))?
        };

        debug!(source, len = bytes.len(), "fetched source document");
        Ok(bytes)
    }
}

// Schemes are case-insensitive, so `HTTP://` still goes over the network.
fn is_http(source: &str) -> bool {
    source.split_once("://").is_some_and(|(scheme, _rest)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

//! Page fetching.
//!
//! One GET per run, no retries. The response body is not buffered here; it is
//! handed on as a [`PageStream`] for the extractor to consume.

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Url;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::core::PageStream;
use crate::errors::{BoxError, FetchError, FetchErrorKind};

/// Protocol for page fetching.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body as a stream.
    async fn fetch(&self, url: &str) -> Result<PageStream, FetchError>;
}

/// Fetcher backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds the HTTP client for `config`.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            FetchError::new(FetchErrorKind::InvalidRequest, "failed to build HTTP client")
                .with_source(e)
        })?;
        Ok(Self { client, config })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn request_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::invalid_request(url, e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(FetchError::network(
                url,
                format!("unsupported protocol scheme {scheme:?}"),
            )),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageStream, FetchError> {
        let request_url = Self::request_url(url)?;
        debug!(%url, user_agent = %self.config.user_agent, "fetching page");

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            debug!(%url, status = status.as_u16(), "page responded");
        } else {
            warn!(%url, status = status.as_u16(), "page responded with an error status");
        }

        let chunks = response
            .bytes_stream()
            .map_ok(|bytes| bytes.to_vec())
            .map_err(BoxError::from);
        Ok(PageStream::new(url, status.as_u16(), chunks))
    }
}

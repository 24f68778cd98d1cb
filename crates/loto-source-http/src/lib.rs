// # HTTP Page Fetcher
//
// This crate provides the reqwest-based `PageFetcher` for the results pipeline.
//
// ## Behavior
//
// - One GET per `fetch()` call, no retries
// - Bounded timeout covering the whole request
// - `User-Agent` header on every request (the results site blocks bare clients)
// - Only `200 OK` counts as success
//
// ## Operational Note
//
// The configured results URL may point at a date-specific page and then has
// to be updated by hand when a new draw is published.

use loto_core::config::SourceConfig;
use loto_core::error::ConnectivityCause;
use loto_core::traits::{PageFetcher, PageFetcherFactory};
use loto_core::{Error, Result};

use std::time::Duration;

use reqwest::StatusCode;

/// HTTP results page fetcher
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    /// URL of the results page
    url: String,

    /// Request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Create a new HTTP fetcher
    ///
    /// # Parameters
    ///
    /// - `url`: Absolute `http` or `https` URL of the results page
    /// - `timeout`: Upper bound for the whole request, must be non-zero
    /// - `user_agent`: Value of the `User-Agent` header
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let url = url.into();

        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| Error::config(format!("Invalid source URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Source URL must use HTTP or HTTPS scheme, got: {}",
                url
            )));
        }

        if timeout.is_zero() {
            return Err(Error::config("Source timeout must be > 0"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url,
            timeout,
            client,
        })
    }

    /// Create a fetcher from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(config.url.as_str(), config.timeout(), &config.user_agent)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let cause = if err.is_timeout() {
            ConnectivityCause::Timeout
        } else {
            ConnectivityCause::Transport(err.to_string())
        };
        Error::connectivity(self.url.as_str(), cause)
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("{} answered {}", self.url, status);
            return Err(Error::connectivity(
                self.url.as_str(),
                ConnectivityCause::Status(status.as_u16()),
            ));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Factory for creating HTTP fetchers
pub struct HttpFetcherFactory;

impl PageFetcherFactory for HttpFetcherFactory {
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn PageFetcher>> {
        config.validate()?;
        Ok(Box::new(HttpPageFetcher::from_config(config)?))
    }
}

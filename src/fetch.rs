use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::error::PipelineError;
use crate::prelude::*;

/// Single-shot GET capability. Resolves with the response body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, PipelineError>;
}

/// [`Fetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.fetch.accept).wrap_err("Invalid `accept` header value.")?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.fetch.user_agent)
                .wrap_err("Invalid `user_agent` header value.")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.fetch.timeout_secs))
            .build()
            .wrap_err("Failed to build HTTP client.")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, PipelineError> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PipelineError::fetch(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(url, format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|err| PipelineError::fetch(url, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        assert!(HttpFetcher::new(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_bad_header() {
        let mut config = Config::default();
        config.fetch.user_agent = "line\nbreak".into();

        assert!(HttpFetcher::new(&config).is_err());
    }

    #[tokio::test]
    async fn transport_failure() {
        let fetcher = HttpFetcher::new(&Config::default()).unwrap();
        let err = fetcher.get("http://127.0.0.1:1/wiki").await.unwrap_err();

        assert!(matches!(err, PipelineError::FetchFailure { .. }));
    }
}

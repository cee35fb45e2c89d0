//! HTTP client for the music-info service.
//!
//! The service answers `GET <base_url>?group=<group>&song=<song>` with a
//! JSON [`SongDetail`]. Connection failures, timeouts, 429 and 5xx answers
//! are retried according to the client's [`RetryPolicy`]. The timeout bounds
//! the whole lookup, retries included.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::resilience::RetryPolicy;
use super::{MetadataSource, SongDetail};
use crate::error::{EnrichError, EnrichResult};

const SOURCE_NAME: &str = "music-info";

/// Default bound on a whole lookup, retries included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Music-info API client.
#[derive(Debug, Clone)]
pub struct MusicInfoClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl MusicInfoClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`EnrichError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> EnrichResult<Self> {
        let base_url = Url::parse(base_url).map_err(|_| EnrichError::InvalidUrl {
            source_name: SOURCE_NAME.to_string(),
            url: base_url.to_string(),
        })?;

        let http = Client::builder()
            .user_agent(concat!("songlib/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch_once(&self, group: &str, song: &str) -> EnrichResult<SongDetail> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(|e| EnrichError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MetadataSource for MusicInfoClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, group: &str, song: &str) -> EnrichResult<SongDetail> {
        log::debug!("Querying {} for {group:?} / {song:?}", self.base_url);
        let attempts = self.retry.run(SOURCE_NAME, || self.fetch_once(group, song));
        tokio::time::timeout(self.timeout, attempts)
            .await
            .map_err(|_| EnrichError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: format!("no answer within {:?}", self.timeout),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_url() {
        let err = MusicInfoClient::new("not a url", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, EnrichError::InvalidUrl { .. }));
    }

    #[test]
    fn test_accepts_absolute_url() {
        let client = MusicInfoClient::new("http://localhost:8081/info", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url().path(), "/info");
        assert_eq!(client.name(), "music-info");
    }
}

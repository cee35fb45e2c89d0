//! Retry policy for enrichment requests.

use std::future::Future;

use backon::{ExponentialBuilder, Retryable};
use tokio::time::Duration;

use crate::error::{EnrichError, EnrichResult};

/// Exponential backoff applied to transient enrichment failures.
///
/// Only errors for which [`EnrichError::is_transient`] holds are retried;
/// a 4xx or an undecodable body fails on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: usize,
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy allowing `max_retries` retries after the first attempt.
    #[must_use]
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub const fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }

    /// Run `op`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, source_name: &str, op: F) -> EnrichResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = EnrichResult<T>>,
    {
        op.retry(self.backoff())
            .when(EnrichError::is_transient)
            .notify(|err, delay| {
                log::warn!("{source_name}: {err}, retrying in {delay:?}");
            })
            .await
    }
}

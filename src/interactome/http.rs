use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::config::RetryConfig;

/// A reqwest client that retries failed GET requests with exponential
/// backoff
#[derive(Clone, Debug)]
pub struct RetryingClient {
    client: Client,
    retry: RetryConfig,
}

impl RetryingClient {
    pub fn new(retry: &RetryConfig) -> Self {
        RetryingClient {
            client: Client::new(),
            retry: retry.clone(),
        }
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry.status_forcelist.contains(&status.as_u16())
    }

    /// The delay before retry number `attempt + 1`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.retry.backoff_factor_ms.saturating_mul(factor))
    }

    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let result = self.client.get(url).query(params).send().await;

            let failure =
                match result {
                    Ok(res) => {
                        let status = res.status();
                        if status.is_success() {
                            return Ok(res);
                        }
                        if !self.is_retryable(status) {
                            let reason = status.canonical_reason().unwrap_or("unknown reason");
                            return Err(anyhow!("HTTP request to {} failed: {} - {}",
                                               url, status, reason));
                        }
                        format!("status {}", status)
                    },
                    Err(err) => format!("{}", err),
                };

            if attempt >= self.retry.max_retries {
                return Err(anyhow!("HTTP request to {} failed after {} retries: {}",
                                   url, attempt, failure));
            }

            let delay = self.backoff(attempt);
            warn!("request to {} failed ({}), retrying in {:?}", url, failure, delay);
            tokio::time::sleep(delay).await;
            attempt += 1;
            debug!("retry {} of {} for {}", attempt, self.retry.max_retries, url);
        }
    }
}

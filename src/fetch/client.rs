// src/fetch/client.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;

/// Why a GET against the report server produced no body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status. Never retried.
    #[error("unexpected response status {status} at {url}")]
    Status { status: u16, url: String },

    /// Connection-level failures persisted through every attempt.
    #[error("GET {url} failed after {attempts} attempts: {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Pooled HTTP client rooted at the report directory. Cheap to share: the
/// inner `reqwest::Client` is reference counted and keeps connections alive
/// across requests.
#[derive(Debug, Clone)]
pub struct TransportClient {
    client: Client,
    base_url: Url,
    max_attempts: u32,
    retry_delay: Duration,
}

impl TransportClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
        })
    }

    /// GET `{base}/{file_name}` and return the raw body.
    pub async fn get_bytes(&self, file_name: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.base_url.join(file_name)?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(%url, attempt, "GET");

            // 1) send
            let resp = match self.client.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) if attempt < self.max_attempts => {
                    warn!(%url, attempt, error = %e, "request failed, retrying");
                    sleep(self.retry_delay).await;
                    continue;
                }
                Err(e) => return Err(self.exhausted(&url, attempt, e)),
            };

            // 2) application errors go straight back to the caller
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            // 3) body
            match resp.bytes().await {
                Ok(body) => return Ok(body.to_vec()),
                Err(e) if attempt < self.max_attempts => {
                    warn!(%url, attempt, error = %e, "reading body failed, retrying");
                    sleep(self.retry_delay).await;
                }
                Err(e) => return Err(self.exhausted(&url, attempt, e)),
            }
        }
    }

    /// Like [`get_bytes`](Self::get_bytes), decoded as UTF-8 (lossy).
    pub async fn get_text(&self, file_name: &str) -> Result<String, TransportError> {
        let body = self.get_bytes(file_name).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn exhausted(&self, url: &Url, attempts: u32, source: reqwest::Error) -> TransportError {
        error!(%url, attempts, error = %source, "exhausted retries");
        TransportError::Exhausted {
            url: url.to_string(),
            attempts,
            source,
        }
    }
}

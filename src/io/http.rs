use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{Result, ZipError};

/// Downloads a remote file whole so it can be inspected like a local one.
pub struct HttpFetcher {
    client: Client,
    transferred_bytes: AtomicU64,
    max_retry: u32,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ZipError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            transferred_bytes: AtomicU64::new(0),
            max_retry: 10,
        })
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    /// Fetch the body of `url`, retrying connection failures and timeouts.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut retry_count = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        return Err(ZipError::Fetch(format!(
                            "HTTP request failed with status: {}",
                            resp.status()
                        )));
                    }

                    let bytes = resp
                        .bytes()
                        .await
                        .map_err(|e| ZipError::Fetch(e.to_string()))?;
                    self.transferred_bytes
                        .fetch_add(bytes.len() as u64, Ordering::Relaxed);
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        return Err(ZipError::Fetch(format!("max retries exceeded: {e}")));
                    }
                    tracing::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(ZipError::Fetch(e.to_string())),
            }
        }
    }
}
